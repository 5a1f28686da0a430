pub mod categories;
pub mod confirm_email_tokens;
pub mod contacts;
pub mod listing_parameters;
pub mod listings;
pub mod order_lines;
pub mod orders;
pub mod parameters;
pub mod products;
pub mod shop_categories;
pub mod shops;
pub mod users;

pub use categories::Entity as Categories;
pub use confirm_email_tokens::Entity as ConfirmEmailTokens;
pub use contacts::Entity as Contacts;
pub use listing_parameters::Entity as ListingParameters;
pub use listings::Entity as Listings;
pub use order_lines::Entity as OrderLines;
pub use orders::Entity as Orders;
pub use parameters::Entity as Parameters;
pub use products::Entity as Products;
pub use shop_categories::Entity as ShopCategories;
pub use shops::Entity as Shops;
pub use users::Entity as Users;
