use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use oderly_core::health::{healthz, readiness};
use oderly_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    address::{create_address, delete_address, list_addresses},
    auth::{login, profile, signup},
    cart::{add_to_cart, change_quantity, get_cart, remove_cart_item},
    order::{
        cancel_order, change_order_status, create_order, get_order, list_all_orders,
        list_my_orders, list_user_orders,
    },
    product::{
        create_product, delete_product, get_product, list_products, search_products,
        update_product,
    },
    user::{change_role, get_user, list_users, update_user},
};
use crate::state::AppState;

/// Handler for `GET /readyz`: ready once the database answers a ping.
async fn readyz(State(state): State<AppState>) -> StatusCode {
    let ready = state.db.ping().await.is_ok();
    if !ready {
        tracing::warn!("readiness probe failed: database unreachable");
    }
    readiness(ready)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/profile", get(profile))
        // Cart
        .route("/cart/create", post(add_to_cart))
        .route("/cart/getCart", get(get_cart))
        .route("/cart/{id}/change", put(change_quantity))
        .route("/cart/delete/{id}", delete(remove_cart_item))
        // Orders
        .route("/orders", get(list_all_orders))
        .route("/orders/create", post(create_order))
        .route("/orders/getAll", get(list_my_orders))
        .route("/orders/get/{id}", get(get_order))
        .route("/orders/cancel/{id}", put(cancel_order))
        .route("/orders/status/{id}", put(change_order_status))
        .route("/orders/orderByUser/{id}", get(list_user_orders))
        // Products
        .route("/products/create", post(create_product))
        .route("/products/get", get(list_products))
        .route("/products/get/{id}", get(get_product))
        .route("/products/update/{id}", put(update_product))
        .route("/products/delete/{id}", delete(delete_product))
        .route("/products/search", get(search_products))
        // Users
        .route("/user", put(update_user))
        .route("/user/address", post(create_address).get(list_addresses))
        .route("/user/address/{id}", delete(delete_address))
        .route("/user/changeRole/{id}", put(change_role))
        .route("/user/listUsers", get(list_users))
        .route("/user/listUser/{id}", get(get_user))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
