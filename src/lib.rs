// Library exports for wee-rich-text

pub mod component;
pub mod content;
pub mod dom;
pub mod format;
pub mod options;
pub mod richtext;
pub mod surface;
pub mod tools;

pub use component::WeeRichText;
pub use content::{ContentLoader, ContentProvider, EditorHandle};
pub use format::{ActiveFormatSet, FormatCommand};
pub use options::{EditorOptions, Height, OptionsError};
pub use richtext::{ContentChange, PasteOutcome, RichTextEditor, SelectionDispatcher};
pub use surface::{ClipboardData, MemoryEnvironment, MemorySurface, NativeSupport, Surface};
pub use tools::{DEFAULT_TOOLS, ToolDefinition, ToolbarButton};
