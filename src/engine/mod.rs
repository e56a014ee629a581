pub mod classifier;
pub mod progress;
pub mod segmenter;
pub mod view;
