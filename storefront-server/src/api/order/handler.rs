//! Order API Handlers

use axum::extract::State;
use serde::Serialize;

use crate::auth::{AdminUser, CurrentUser};
use crate::core::ServerState;
use crate::db::models::{
    ORDER_STATUS_PENDING, Order, OrderCreateRequest, OrderStatusRequest, OrderView,
};
use crate::db::repository::{AddressRepository, OrderRepository, ProductRepository, UserRepository};
use crate::utils::extract::{Json, Path, Query};
use crate::utils::pagination::PageQuery;
use crate::utils::report::{MonthlySales, MonthlyUsers, sales_by_month, users_by_month};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::util::current_year;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPagination {
    pub total_orders: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub limit: u64,
}

#[derive(Debug, Serialize)]
pub struct OrderList {
    pub orderlist: Vec<OrderView>,
    pub pagination: OrderPagination,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub total_sales: f64,
    pub monthly_sales: Vec<MonthlySales>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersReport {
    pub total_users: u64,
    pub monthly_users: Vec<MonthlyUsers>,
}

/// POST /api/order/create - 下单
///
/// 按行扣减库存 (不低于 0)，每个商品单独写入，不使用事务
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<OrderCreateRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    if req.products.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }

    let products = ProductRepository::new(state.db.clone());
    for line in &req.products {
        match products.decrement_stock(&line.product_id, line.quantity).await {
            Ok(Some(left)) => {
                tracing::debug!(product_id = %line.product_id, left, "Stock decremented");
            }
            Ok(None) => {
                tracing::warn!(product_id = %line.product_id, "Ordered product no longer exists");
            }
            Err(e) => {
                tracing::warn!(product_id = %line.product_id, error = %e, "Stock update failed");
            }
        }
    }

    let order = OrderRepository::new(state.db.clone())
        .create(Order {
            user_id: user.id.clone(),
            products: req.products,
            payment_id: req.payment_id,
            payment_status: req.payment_status,
            order_status: ORDER_STATUS_PENDING.to_string(),
            delivery_address: req.delivery_address,
            total_amt: req.total_amt,
            date: req.date,
            ..Default::default()
        })
        .await?;

    tracing::info!(
        order_id = %order.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        user_id = %user.id,
        total = order.total_amt,
        "Order placed"
    );
    Ok(Json(ApiResponse::success_with_message("Order Placed", order)))
}

/// GET /api/order/Order-list?page=&limit= - 当前用户订单，最新在前
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let page = query.resolve();
    let (orders, total) = OrderRepository::new(state.db.clone())
        .find_page_by_user(&user.id, page.per_page, page.offset())
        .await?;

    let addresses = AddressRepository::new(state.db.clone());
    let mut orderlist = Vec::with_capacity(orders.len());
    for order in orders {
        let details = if order.delivery_address.is_empty() {
            None
        } else {
            addresses
                .find_by_id(&order.delivery_address)
                .await
                .unwrap_or_else(|e| {
                    tracing::debug!(address = %order.delivery_address, error = %e, "Unresolvable delivery address");
                    None
                })
        };
        orderlist.push(OrderView {
            order,
            delivery_address_details: details,
        });
    }

    Ok(Json(ApiResponse::success_with_message(
        "Order list",
        OrderList {
            orderlist,
            pagination: OrderPagination {
                total_orders: total,
                total_pages: page.total_pages(total),
                current_page: page.page,
                limit: page.per_page,
            },
        },
    )))
}

/// PUT /api/order/Order-status/:id - 修改订单状态 (管理员)
pub async fn update_status(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<OrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let status = req.order_status.trim().to_string();
    if status.is_empty() {
        return Err(AppError::required("Provide order_status"));
    }

    let repo = OrderRepository::new(state.db.clone());
    repo.find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    let order = repo.update_status(&id, status).await?;
    Ok(Json(ApiResponse::success_with_message("Status Updated", order)))
}

/// GET /api/order/sales - 销售额月度报表 (管理员)
pub async fn sales(
    State(state): State<ServerState>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<SalesReport>>> {
    let rows: Vec<(i64, f64)> = OrderRepository::new(state.db.clone())
        .sales_rows()
        .await?
        .into_iter()
        .map(|r| (r.created_at, r.total_amt))
        .collect();
    let (total_sales, monthly_sales) = sales_by_month(&rows, current_year());
    Ok(Json(ApiResponse::success(SalesReport {
        total_sales,
        monthly_sales,
    })))
}

/// GET /api/order/users - 新增用户月度报表 (管理员)
pub async fn users(
    State(state): State<ServerState>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<UsersReport>>> {
    let repo = UserRepository::new(state.db.clone());
    let total_users = repo.count_all().await?;
    let monthly_users = users_by_month(&repo.created_timestamps().await?, current_year());
    Ok(Json(ApiResponse::success(UsersReport {
        total_users,
        monthly_users,
    })))
}
