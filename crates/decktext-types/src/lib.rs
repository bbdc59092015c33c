pub mod card;
pub mod field_model;
pub mod guid;
pub mod identity;
pub mod media;
pub mod note;

pub use card::{Family, TextCard};
pub use field_model::{FieldModel, MIN_ARITY};
pub use guid::Guid;
pub use identity::IdentitySet;
pub use media::MediaIndex;
pub use note::{FIELD_SEPARATOR, RawNote, join_fields};
