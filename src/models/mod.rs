pub mod model_version;
pub mod movie;
pub mod user;

pub use model_version::{CurrentModel, ModelInfo, ModelList, SwitchAck};
pub use movie::{Movie, MovieDetail};
pub use user::{Rating, RatingEntry, User};
