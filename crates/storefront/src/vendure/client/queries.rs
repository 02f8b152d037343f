//! Shop API operation documents.
//!
//! Each operation is a marker type implementing [`GraphQLQuery`] next to a
//! module holding its document, variables and response data, the same shape
//! the `graphql_client` derive generates. Mutation fields that return an
//! `ErrorResult` union are kept as raw JSON and resolved in `conversions`.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

macro_rules! shop_operation {
    ($marker:ident, $module:ident) => {
        pub struct $marker;

        impl GraphQLQuery for $marker {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

macro_rules! order_fields {
    () => {
        "id code totalQuantity subTotalWithTax shippingWithTax totalWithTax currencyCode \
         lines { id quantity unitPriceWithTax linePriceWithTax featuredAsset { preview } \
         productVariant { id name sku product { name slug } } }"
    };
}

macro_rules! customer_fields {
    () => {
        "id title firstName lastName emailAddress phoneNumber"
    };
}

/// Variables for operations that take none.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NoVariables {}

// =============================================================================
// Queries
// =============================================================================

shop_operation!(SearchProducts, search_products);

pub mod search_products {
    use super::{Deserialize, Serialize};
    use crate::vendure::types::{SearchInput, SearchResult};

    pub const OPERATION_NAME: &str = "SearchProducts";
    pub const QUERY: &str = "query SearchProducts($input: SearchInput!) { \
        search(input: $input) { totalItems \
        items { productId productName slug productAsset { preview } \
        priceWithTax { __typename ... on SinglePrice { value } ... on PriceRange { min max } } \
        currencyCode } \
        facetValues { count facetValue { id name facet { id name } } } } }";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: SearchInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub search: SearchResult,
    }
}

shop_operation!(GetProduct, get_product);

pub mod get_product {
    use super::{Deserialize, Serialize};
    use crate::vendure::types::Product;

    pub const OPERATION_NAME: &str = "GetProduct";
    pub const QUERY: &str = "query GetProduct($slug: String!) { \
        product(slug: $slug) { id name slug description \
        featuredAsset { id preview source } assets { id preview source } \
        collections { id name slug parent { id } } \
        optionGroups { id code name options { id code name } } \
        variants { id name sku priceWithTax currencyCode stockLevel \
        options { id code name groupId } } } }";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub slug: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<Product>,
    }
}

shop_operation!(GetCollection, get_collection);

pub mod get_collection {
    use super::{Deserialize, Serialize};
    use crate::vendure::types::Collection;

    pub const OPERATION_NAME: &str = "GetCollection";
    pub const QUERY: &str = "query GetCollection($slug: String!) { \
        collection(slug: $slug) { id name slug description featuredAsset { preview } } }";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub slug: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collection: Option<Collection>,
    }
}

shop_operation!(GetTopCollections, get_top_collections);

pub mod get_top_collections {
    use super::{Deserialize, NoVariables};
    use crate::vendure::types::CollectionSummary;

    pub const OPERATION_NAME: &str = "GetTopCollections";
    pub const QUERY: &str = "query GetTopCollections { \
        collections(options: { topLevelOnly: true }) { \
        items { id name slug featuredAsset { preview } } } }";

    pub type Variables = NoVariables;

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collections: CollectionList,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CollectionList {
        pub items: Vec<CollectionSummary>,
    }
}

shop_operation!(GetActiveChannel, get_active_channel);

pub mod get_active_channel {
    use super::{Deserialize, NoVariables};
    use crate::vendure::types::Channel;

    pub const OPERATION_NAME: &str = "GetActiveChannel";
    pub const QUERY: &str = "query GetActiveChannel { \
        activeChannel { id code defaultCurrencyCode availableCurrencyCodes \
        defaultLanguageCode availableLanguageCodes } }";

    pub type Variables = NoVariables;

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub active_channel: Channel,
    }
}

shop_operation!(GetActiveCustomer, get_active_customer);

pub mod get_active_customer {
    use super::{Deserialize, NoVariables};
    use crate::vendure::types::Customer;

    pub const OPERATION_NAME: &str = "GetActiveCustomer";
    pub const QUERY: &str = concat!(
        "query GetActiveCustomer { activeCustomer { ",
        customer_fields!(),
        " } }"
    );

    pub type Variables = NoVariables;

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub active_customer: Option<Customer>,
    }
}

shop_operation!(GetActiveOrder, get_active_order);

pub mod get_active_order {
    use super::{Deserialize, NoVariables};
    use crate::vendure::types::Order;

    pub const OPERATION_NAME: &str = "GetActiveOrder";
    pub const QUERY: &str = concat!(
        "query GetActiveOrder { activeOrder { ",
        order_fields!(),
        " } }"
    );

    pub type Variables = NoVariables;

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub active_order: Option<Order>,
    }
}

// =============================================================================
// Order mutations
// =============================================================================

shop_operation!(AddItemToOrder, add_item_to_order);

pub mod add_item_to_order {
    use super::{Deserialize, Serialize};
    use ever_and_always_core::VariantId;

    pub const OPERATION_NAME: &str = "AddItemToOrder";
    pub const QUERY: &str = concat!(
        "mutation AddItemToOrder($variantId: ID!, $quantity: Int!) { \
         addItemToOrder(productVariantId: $variantId, quantity: $quantity) { __typename \
         ... on Order { ",
        order_fields!(),
        " } ... on ErrorResult { errorCode message } } }"
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub variant_id: VariantId,
        pub quantity: u32,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub add_item_to_order: serde_json::Value,
    }
}

shop_operation!(AdjustOrderLine, adjust_order_line);

pub mod adjust_order_line {
    use super::{Deserialize, Serialize};
    use ever_and_always_core::OrderLineId;

    pub const OPERATION_NAME: &str = "AdjustOrderLine";
    pub const QUERY: &str = concat!(
        "mutation AdjustOrderLine($orderLineId: ID!, $quantity: Int!) { \
         adjustOrderLine(orderLineId: $orderLineId, quantity: $quantity) { __typename \
         ... on Order { ",
        order_fields!(),
        " } ... on ErrorResult { errorCode message } } }"
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub order_line_id: OrderLineId,
        pub quantity: u32,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub adjust_order_line: serde_json::Value,
    }
}

shop_operation!(RemoveOrderLine, remove_order_line);

pub mod remove_order_line {
    use super::{Deserialize, Serialize};
    use ever_and_always_core::OrderLineId;

    pub const OPERATION_NAME: &str = "RemoveOrderLine";
    pub const QUERY: &str = concat!(
        "mutation RemoveOrderLine($orderLineId: ID!) { \
         removeOrderLine(orderLineId: $orderLineId) { __typename \
         ... on Order { ",
        order_fields!(),
        " } ... on ErrorResult { errorCode message } } }"
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub order_line_id: OrderLineId,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub remove_order_line: serde_json::Value,
    }
}

// =============================================================================
// Account mutations
// =============================================================================

shop_operation!(Login, login);

pub mod login {
    use super::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "Login";
    pub const QUERY: &str = "mutation Login($username: String!, $password: String!, $rememberMe: Boolean) { \
        login(username: $username, password: $password, rememberMe: $rememberMe) { __typename \
        ... on CurrentUser { id identifier } ... on ErrorResult { errorCode message } } }";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub username: String,
        pub password: String,
        pub remember_me: bool,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub login: serde_json::Value,
    }
}

shop_operation!(Logout, logout);

pub mod logout {
    use super::{Deserialize, NoVariables};

    pub const OPERATION_NAME: &str = "Logout";
    pub const QUERY: &str = "mutation Logout { logout { success } }";

    pub type Variables = NoVariables;

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub logout: serde_json::Value,
    }
}

shop_operation!(RegisterCustomerAccount, register_customer_account);

pub mod register_customer_account {
    use super::{Deserialize, Serialize};
    use crate::vendure::types::RegisterCustomerInput;

    pub const OPERATION_NAME: &str = "RegisterCustomerAccount";
    pub const QUERY: &str = "mutation RegisterCustomerAccount($input: RegisterCustomerInput!) { \
        registerCustomerAccount(input: $input) { __typename \
        ... on Success { success } ... on ErrorResult { errorCode message } } }";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: RegisterCustomerInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub register_customer_account: serde_json::Value,
    }
}

shop_operation!(VerifyCustomerAccount, verify_customer_account);

pub mod verify_customer_account {
    use super::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "VerifyCustomerAccount";
    pub const QUERY: &str = "mutation VerifyCustomerAccount($token: String!, $password: String) { \
        verifyCustomerAccount(token: $token, password: $password) { __typename \
        ... on CurrentUser { id identifier } ... on ErrorResult { errorCode message } } }";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub token: String,
        pub password: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub verify_customer_account: serde_json::Value,
    }
}

shop_operation!(RequestPasswordReset, request_password_reset);

pub mod request_password_reset {
    use super::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "RequestPasswordReset";
    pub const QUERY: &str = "mutation RequestPasswordReset($emailAddress: String!) { \
        requestPasswordReset(emailAddress: $emailAddress) { __typename \
        ... on Success { success } ... on ErrorResult { errorCode message } } }";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub email_address: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub request_password_reset: serde_json::Value,
    }
}

shop_operation!(ResetPassword, reset_password);

pub mod reset_password {
    use super::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "ResetPassword";
    pub const QUERY: &str = "mutation ResetPassword($token: String!, $password: String!) { \
        resetPassword(token: $token, password: $password) { __typename \
        ... on CurrentUser { id identifier } ... on ErrorResult { errorCode message } } }";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub token: String,
        pub password: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub reset_password: serde_json::Value,
    }
}

shop_operation!(UpdateCustomer, update_customer);

pub mod update_customer {
    use super::{Deserialize, Serialize};
    use crate::vendure::types::{Customer, UpdateCustomerInput};

    pub const OPERATION_NAME: &str = "UpdateCustomer";
    pub const QUERY: &str = concat!(
        "mutation UpdateCustomer($input: UpdateCustomerInput!) { updateCustomer(input: $input) { ",
        customer_fields!(),
        " } }"
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: UpdateCustomerInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub update_customer: Customer,
    }
}

shop_operation!(UpdateCustomerPassword, update_customer_password);

pub mod update_customer_password {
    use super::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "UpdateCustomerPassword";
    pub const QUERY: &str = "mutation UpdateCustomerPassword($currentPassword: String!, $newPassword: String!) { \
        updateCustomerPassword(currentPassword: $currentPassword, newPassword: $newPassword) { __typename \
        ... on Success { success } ... on ErrorResult { errorCode message } } }";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub current_password: String,
        pub new_password: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub update_customer_password: serde_json::Value,
    }
}

shop_operation!(RequestUpdateCustomerEmailAddress, request_update_customer_email_address);

pub mod request_update_customer_email_address {
    use super::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "RequestUpdateCustomerEmailAddress";
    pub const QUERY: &str = "mutation RequestUpdateCustomerEmailAddress($password: String!, $newEmailAddress: String!) { \
        requestUpdateCustomerEmailAddress(password: $password, newEmailAddress: $newEmailAddress) { __typename \
        ... on Success { success } ... on ErrorResult { errorCode message } } }";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub password: String,
        pub new_email_address: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub request_update_customer_email_address: serde_json::Value,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_carries_operation_name() {
        let body = GetProduct::build_query(get_product::Variables {
            slug: "halo".to_string(),
        });
        assert_eq!(body.operation_name, "GetProduct");
        assert!(body.query.starts_with("query GetProduct("));
        assert_eq!(
            serde_json::to_value(&body.variables).unwrap(),
            serde_json::json!({"slug": "halo"})
        );
    }

    #[test]
    fn test_order_fragment_is_inlined() {
        assert!(get_active_order::QUERY.contains("totalQuantity"));
        assert!(add_item_to_order::QUERY.contains("... on ErrorResult"));
        assert!(add_item_to_order::QUERY.contains("productVariant { id name sku"));
    }

    #[test]
    fn test_empty_variables_serialize_as_object() {
        let body = GetActiveOrder::build_query(NoVariables::default());
        assert_eq!(
            serde_json::to_value(&body.variables).unwrap(),
            serde_json::json!({})
        );
    }
}
