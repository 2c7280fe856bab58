//! Database Models
//!
//! 文档字段使用 camelCase 线上名称，`id` 统一序列化为 "table:id" 字符串。

pub mod serde_helpers;

// Accounts
pub mod address;
pub mod user;

// Catalog
pub mod category;
pub mod product;
pub mod variant;

// Shopping
pub mod cart;
pub mod my_list;
pub mod order;
pub mod review;

// Content
pub mod banner;
pub mod blog;
pub mod home_slide;

pub use address::{Address, AddressInput, AddressUpdate};
pub use banner::{Banner, BannerUpdate};
pub use blog::{Blog, BlogUpdate};
pub use cart::{CartAddRequest, CartItem, CartItemUpdate, CartUpdateRequest};
pub use category::{Category, CategoryNode, CategoryUpdate, ParentSummary, SubCategoryView};
pub use home_slide::{HomeSlide, SlideInput};
pub use my_list::{MyListAddRequest, MyListItem};
pub use order::{
    ORDER_STATUS_PENDING, Order, OrderCreateRequest, OrderLine, OrderStatusRequest, OrderView,
};
pub use product::{Product, ProductFilter, ProductSort, ProductUpdate};
pub use review::{Review, ReviewInput};
pub use user::{
    EmailRequest, GoogleAuthRequest, LoginRequest, OtpPurpose, RegisterRequest,
    ResetPasswordRequest, StatusRequest, User, UserProfile, UserRole, UserStatus, UserUpdate,
    UserUpdateRequest, VerifyOtpRequest,
};
pub use variant::{ProductVariant, VariantInput, VariantKind};
