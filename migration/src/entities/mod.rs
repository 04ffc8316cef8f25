pub mod sequence_counter;
pub mod url_mapping;

pub use sequence_counter::Entity as SequenceCounterEntity;
pub use url_mapping::Entity as UrlMappingEntity;
