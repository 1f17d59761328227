pub mod asset;
pub mod bar;
pub mod bar_table;
pub mod news;
pub mod request_params;
pub mod timeframe;
