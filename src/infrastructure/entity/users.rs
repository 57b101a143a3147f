use sea_orm::entity::prelude::*;

/// `id` and `created_at` are filled in by column defaults on insert.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer_id: String,
    pub role_id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::corporate_customers::Entity",
        from = "Column::CustomerId",
        to = "super::corporate_customers::Column::Id"
    )]
    CorporateCustomer,
    #[sea_orm(
        belongs_to = "super::user_roles::Entity",
        from = "Column::RoleId",
        to = "super::user_roles::Column::Id"
    )]
    UserRole,
}

impl Related<super::corporate_customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CorporateCustomer.def()
    }
}

impl Related<super::user_roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRole.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
