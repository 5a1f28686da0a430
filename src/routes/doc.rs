use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{ConfirmEmailRequest, LoginRequest, LoginResponse, RegisterRequest, UpdateDetailsRequest},
        basket::{
            AddItemsRequest, BasketItemEntry, BasketLine, BasketView, BasketWriteReport,
            EntryError, QuantityUpdate, QuantityUpdateReport, RemoveItemsRequest, RemoveReport,
            UpdateQuantitiesRequest,
        },
        catalog::{
            CategoryList, CategoryRef, ListingDetail, ListingList, ParameterValue, ProductRef,
            ShopList, ShopRef,
        },
        contacts::{
            ContactList, CreateContactRequest, DeleteContactsRequest, DeleteReport,
            UpdateContactRequest,
        },
        orders::{CheckoutRequest, CheckoutResponse, OrderLineDetail, OrderList, OrderSummary},
        partner::{ImportEntryError, ImportReport, PriceList, PriceListCategory, PriceListGood, StateRequest},
    },
    models::{Category, Contact, Listing, Order, OrderLine, Product, Shop, User},
    response::{ApiResponse, Meta},
    routes::{account, auth, basket, categories, health, orders, params, partner, products, shops},
};
use crate::routes::health::HealthData;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::confirm,
        auth::login,
        account::get_details,
        account::update_details,
        account::list_contacts,
        account::create_contact,
        account::update_contact,
        account::delete_contacts,
        products::search_listings,
        shops::list_shops,
        categories::list_categories,
        basket::get_basket,
        basket::add_items,
        basket::update_quantities,
        basket::remove_items,
        orders::list_orders,
        orders::checkout,
        partner::update_price_list,
        partner::get_state,
        partner::set_state,
        partner::list_orders
    ),
    components(
        schemas(
            HealthData,
            User,
            Contact,
            Shop,
            Category,
            Product,
            Listing,
            Order,
            OrderLine,
            RegisterRequest,
            ConfirmEmailRequest,
            LoginRequest,
            LoginResponse,
            UpdateDetailsRequest,
            CreateContactRequest,
            UpdateContactRequest,
            DeleteContactsRequest,
            DeleteReport,
            ContactList,
            ListingDetail,
            ListingList,
            ShopRef,
            ProductRef,
            CategoryRef,
            ParameterValue,
            ShopList,
            CategoryList,
            AddItemsRequest,
            BasketItemEntry,
            QuantityUpdate,
            UpdateQuantitiesRequest,
            RemoveItemsRequest,
            EntryError,
            BasketWriteReport,
            QuantityUpdateReport,
            RemoveReport,
            BasketLine,
            BasketView,
            CheckoutRequest,
            CheckoutResponse,
            OrderLineDetail,
            OrderSummary,
            OrderList,
            PriceList,
            PriceListCategory,
            PriceListGood,
            ImportEntryError,
            ImportReport,
            StateRequest,
            params::Pagination,
            params::ListingQuery,
            Meta,
            ApiResponse<User>,
            ApiResponse<ListingList>,
            ApiResponse<OrderList>,
            ApiResponse<BasketView>,
            ApiResponse<ImportReport>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, confirmation and login"),
        (name = "Account", description = "Profile and contact management"),
        (name = "Catalog", description = "Shops, categories and listing search"),
        (name = "Basket", description = "Basket mutation"),
        (name = "Orders", description = "Checkout and order history"),
        (name = "Partner", description = "Shop price imports and order feed"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
