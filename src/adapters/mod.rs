// Adapters layer: concrete data feeds and renderers for the statement engine.

pub mod csv_feed;
pub mod json_feed;
pub mod json_renderer;
pub mod text_renderer;

pub use csv_feed::CsvFeed;
pub use json_feed::JsonFeed;
pub use json_renderer::JsonRenderer;
pub use text_renderer::TextRenderer;
