pub mod candidate;
pub mod intent;
pub mod knowledge_base;
pub mod settings;

pub use candidate::*;
pub use intent::*;
pub use knowledge_base::*;
pub use settings::*;
