//! Product Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Product document
///
/// Category references are stored three levels deep, each as id plus
/// display name, so listing pages never need a join.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Product {
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "serde_helpers::vec_or_empty")]
    pub images: Vec<String>,
    pub brand: String,
    pub price: f64,
    pub old_price: f64,
    pub cat_name: String,
    #[serde(rename = "CatId")]
    pub cat_id: String,
    pub sub_cat_id: String,
    pub sub_cat: String,
    #[serde(rename = "thirdsubCat")]
    pub third_sub_cat: String,
    #[serde(rename = "thirdsubCatId")]
    pub third_sub_cat_id: String,
    /// Category record id ("category:xxx")
    pub category: String,
    pub count_in_stock: i64,
    pub rating: f64,
    #[serde(deserialize_with = "serde_helpers::bool_false")]
    pub is_featured: bool,
    pub discount: f64,
    pub sale: i64,
    #[serde(deserialize_with = "serde_helpers::vec_or_empty")]
    pub product_ram: Vec<String>,
    #[serde(deserialize_with = "serde_helpers::vec_or_empty")]
    pub size: Vec<String>,
    #[serde(deserialize_with = "serde_helpers::vec_or_empty")]
    pub product_weight: Vec<String>,
    #[serde(
        rename = "bannerimages",
        deserialize_with = "serde_helpers::vec_or_empty"
    )]
    pub banner_images: Vec<String>,
    pub banner_title_name: String,
    #[serde(deserialize_with = "serde_helpers::bool_false")]
    pub is_display_on_home_banner: bool,
    pub user_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Product {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }

    /// Product images and banner images, for CDN cleanup
    pub fn all_images(&self) -> impl Iterator<Item = &String> {
        self.images.iter().chain(self.banner_images.iter())
    }
}

/// Partial product update (JSON `PUT /updateProduct/{id}` and the
/// upsert path of `createProduct`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 300))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub old_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cat_name: Option<String>,
    #[serde(rename = "CatId", alias = "catId", skip_serializing_if = "Option::is_none")]
    pub cat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_cat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_cat: Option<String>,
    #[serde(rename = "thirdsubCat", skip_serializing_if = "Option::is_none")]
    pub third_sub_cat: Option<String>,
    #[serde(rename = "thirdsubCatId", skip_serializing_if = "Option::is_none")]
    pub third_sub_cat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub count_in_stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_ram: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_weight: Option<Vec<String>>,
    #[serde(
        rename = "bannerimages",
        alias = "bannerImages",
        skip_serializing_if = "Option::is_none"
    )]
    pub banner_images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_title_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_display_on_home_banner: Option<bool>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl ProductUpdate {
    /// Copy every provided field onto `product`
    pub fn apply_to(self, product: &mut Product) {
        macro_rules! set {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = self.$field {
                    product.$field = v;
                })*
            };
        }
        set!(
            name,
            description,
            images,
            brand,
            price,
            old_price,
            cat_name,
            cat_id,
            sub_cat_id,
            sub_cat,
            third_sub_cat,
            third_sub_cat_id,
            category,
            count_in_stock,
            rating,
            is_featured,
            discount,
            sale,
            product_ram,
            size,
            product_weight,
            banner_images,
            banner_title_name,
            is_display_on_home_banner,
        );
    }
}

/// Server-side listing filter
///
/// Category id lists are OR-ed together; every other condition is AND-ed.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub cat_ids: Vec<String>,
    pub sub_cat_ids: Vec<String>,
    pub third_sub_cat_ids: Vec<String>,
    pub cat_name: Option<String>,
    pub sub_cat_name: Option<String>,
    pub third_sub_cat_name: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Exact rating match
    pub rating: Option<f64>,
    /// Rating lower bound
    pub min_rating: Option<f64>,
    pub featured: Option<bool>,
}

/// Listing order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSort {
    #[default]
    Newest,
    RatingDesc,
}

impl ProductSort {
    pub fn order_clause(&self) -> &'static str {
        match self {
            ProductSort::Newest => "ORDER BY createdAt DESC",
            ProductSort::RatingDesc => "ORDER BY rating DESC, createdAt DESC",
        }
    }
}

impl ProductFilter {
    /// Builds the WHERE clause and its bind values
    ///
    /// Column names are fixed strings; only values are bound.
    pub fn to_where(&self) -> (String, Vec<(&'static str, serde_json::Value)>) {
        let mut clauses: Vec<String> = Vec::new();
        let mut binds: Vec<(&'static str, serde_json::Value)> = Vec::new();

        let mut scopes: Vec<&str> = Vec::new();
        if !self.cat_ids.is_empty() {
            scopes.push("CatId IN $cat_ids");
            binds.push(("cat_ids", serde_json::json!(self.cat_ids)));
        }
        if !self.sub_cat_ids.is_empty() {
            scopes.push("subCatId IN $sub_cat_ids");
            binds.push(("sub_cat_ids", serde_json::json!(self.sub_cat_ids)));
        }
        if !self.third_sub_cat_ids.is_empty() {
            scopes.push("thirdsubCatId IN $third_sub_cat_ids");
            binds.push(("third_sub_cat_ids", serde_json::json!(self.third_sub_cat_ids)));
        }
        if !scopes.is_empty() {
            clauses.push(format!("({})", scopes.join(" OR ")));
        }

        if let Some(name) = &self.cat_name {
            clauses.push("catName = $cat_name".into());
            binds.push(("cat_name", serde_json::json!(name)));
        }
        if let Some(name) = &self.sub_cat_name {
            clauses.push("subCat = $sub_cat_name".into());
            binds.push(("sub_cat_name", serde_json::json!(name)));
        }
        if let Some(name) = &self.third_sub_cat_name {
            clauses.push("thirdsubCat = $third_sub_cat_name".into());
            binds.push(("third_sub_cat_name", serde_json::json!(name)));
        }
        if let Some(min) = self.min_price {
            clauses.push("price >= $min_price".into());
            binds.push(("min_price", serde_json::json!(min)));
        }
        if let Some(max) = self.max_price {
            clauses.push("price <= $max_price".into());
            binds.push(("max_price", serde_json::json!(max)));
        }
        if let Some(rating) = self.rating {
            clauses.push("rating = $rating".into());
            binds.push(("rating", serde_json::json!(rating)));
        }
        if let Some(min) = self.min_rating {
            clauses.push("rating >= $min_rating".into());
            binds.push(("min_rating", serde_json::json!(min)));
        }
        if let Some(featured) = self.featured {
            clauses.push("isFeatured = $featured".into());
            binds.push(("featured", serde_json::json!(featured)));
        }

        if clauses.is_empty() {
            (String::new(), binds)
        } else {
            (format!("WHERE {}", clauses.join(" AND ")), binds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let product = Product {
            cat_id: "category:a".into(),
            third_sub_cat_id: "category:c".into(),
            banner_images: vec!["b.png".into()],
            count_in_stock: 3,
            ..Default::default()
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["CatId"], "category:a");
        assert_eq!(json["thirdsubCatId"], "category:c");
        assert_eq!(json["bannerimages"][0], "b.png");
        assert_eq!(json["countInStock"], 3);
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_update_skips_absent_fields() {
        let update: ProductUpdate =
            serde_json::from_str(r#"{"price": 12.5, "catId": "category:x"}"#).unwrap();
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"price": 12.5, "CatId": "category:x"}));
    }

    #[test]
    fn test_apply_to_only_touches_provided() {
        let mut product = Product {
            name: "Phone".into(),
            price: 10.0,
            ..Default::default()
        };
        ProductUpdate {
            price: Some(12.0),
            size: Some(vec!["M".into()]),
            ..Default::default()
        }
        .apply_to(&mut product);
        assert_eq!(product.name, "Phone");
        assert_eq!(product.price, 12.0);
        assert_eq!(product.size, vec!["M"]);
    }

    #[test]
    fn test_filter_empty() {
        let (clause, binds) = ProductFilter::default().to_where();
        assert!(clause.is_empty());
        assert!(binds.is_empty());
    }

    #[test]
    fn test_filter_category_union_and_price() {
        let filter = ProductFilter {
            cat_ids: vec!["category:a".into()],
            sub_cat_ids: vec!["category:b".into()],
            min_price: Some(10.0),
            min_rating: Some(3.0),
            ..Default::default()
        };
        let (clause, binds) = filter.to_where();
        assert_eq!(
            clause,
            "WHERE (CatId IN $cat_ids OR subCatId IN $sub_cat_ids) AND price >= $min_price AND rating >= $min_rating"
        );
        assert_eq!(binds.len(), 4);
    }
}
