pub mod save_catalog;
