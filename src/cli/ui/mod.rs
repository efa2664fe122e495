pub mod list_selector;
pub mod table_renderer;
