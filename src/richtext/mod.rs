// Formatting-state synchronization core

pub mod applicator;
pub mod detector;
pub mod editor;
pub mod selection_events;

pub use applicator::Applied;
pub use detector::FormatDetector;
pub use editor::{ContentChange, Deferred, PasteOutcome, RichTextEditor};
pub use selection_events::{SelectionDispatcher, SelectionListener, Subscription};
