use crate::storage::Mapping;
use migration::entities::url_mapping;

/// 将 Sea-ORM Model 转换为 Mapping
pub fn model_to_mapping(model: url_mapping::Model) -> Mapping {
    Mapping {
        code: model.short_code,
        target: model.long_url,
        created_at: model.created_at,
    }
}

/// 将 Mapping 转换为插入用的 ActiveModel
pub fn mapping_to_active_model(mapping: &Mapping) -> url_mapping::ActiveModel {
    use sea_orm::ActiveValue::Set;

    url_mapping::ActiveModel {
        short_code: Set(mapping.code.clone()),
        long_url: Set(mapping.target.clone()),
        created_at: Set(mapping.created_at),
    }
}
