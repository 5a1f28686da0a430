use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "parameters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::listing_parameters::Entity")]
    ListingParameters,
}

impl Related<super::listing_parameters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ListingParameters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
