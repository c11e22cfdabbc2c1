pub mod apps;
pub mod intent;
pub mod model;
