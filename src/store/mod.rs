//! The store: index structures wired to their backing files.
//!
//! ## Architecture
//!
//! ```text
//!              ┌──────────── Store ────────────┐
//!  CLI  ──►    │ ProductTree   OrderHeap  Cart │  ──► DataFiles
//!              │ CustomerTable SalesTable      │      (write-through)
//!              │ AdminTable    IdCounters      │
//!              └───────────────────────────────┘
//! ```
//!
//! ## Write-through
//!
//! Every successful mutation rewrites its backing file in full before the
//! call returns. Shipments are the exception: they are appended. A failed
//! write is logged and the in-memory state stays authoritative.
//!
//! ## Startup
//!
//! [`Store::open`] creates the data directories (fatal if unwritable), then
//! loads id counters, products, orders, customers, sales and admins in that
//! order. Orders are loaded after products because their lines are rebuilt
//! from the catalog.

mod admin;
mod cart;
mod customers;
mod ids;
mod sales;
mod shipments;

pub use admin::{
    hash_password, validate_password, validate_username, AdminTable, DEFAULT_ADMIN_PASSWORD,
    DEFAULT_ADMIN_USERNAME,
};
pub use cart::Cart;
pub use customers::CustomerTable;
pub use ids::IdCounters;
pub use sales::{validate_month_key, SalesTable};
pub use shipments::{ShipmentTally, STATUS_DELIVERED, STATUS_IN_PROGRESS};

use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::{
    StoreConfig, ADMINS_FILE, CUSTOMERS_FILE, ID_COUNTERS_FILE, ORDERS_FILE, PRODUCTS_FILE,
    SALES_FILE,
};
use crate::error::{StoreError, StoreResult, ValidationError};
use crate::index::{LinkedList, OrderHeap, ProductTree};
use crate::persist::codec::{decode_order, decode_product, encode_order, encode_product, encode_shipment};
use crate::persist::{DataFiles, OrderRecord};
use crate::types::price::{parse_price, parse_quantity};
use crate::types::{
    month_key_from_timestamp, Customer, Order, OrderLine, PaymentMethod, Product, TIMESTAMP_FORMAT,
};

// ============================================================================
// Inputs
// ============================================================================

/// Customer details collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDetails {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
}

impl CheckoutDetails {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
            payment_method,
        }
    }
}

/// A partial product update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductEdit {
    pub name: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<u32>,
}

impl ProductEdit {
    /// Build an edit from raw form input, where a blank field means "keep".
    ///
    /// # Example
    ///
    /// ```
    /// use famin_store::store::ProductEdit;
    ///
    /// let edit = ProductEdit::from_input("", "", "Summer", "1200", "").unwrap();
    /// assert_eq!(edit.subcategory.as_deref(), Some("Summer"));
    /// assert!(edit.name.is_none());
    /// assert!(edit.quantity.is_none());
    ///
    /// assert!(ProductEdit::from_input("", "", "", "cheap", "").is_err());
    /// ```
    pub fn from_input(
        name: &str,
        category: &str,
        subcategory: &str,
        price: &str,
        quantity: &str,
    ) -> Result<Self, ValidationError> {
        fn text(s: &str) -> Option<String> {
            (!s.is_empty()).then(|| s.to_string())
        }

        Ok(Self {
            name: text(name),
            category: text(category),
            subcategory: text(subcategory),
            price: if price.trim().is_empty() { None } else { Some(parse_price(price)?) },
            quantity: if quantity.trim().is_empty() { None } else { Some(parse_quantity(quantity)?) },
        })
    }

    /// The product with this edit applied
    pub fn apply(&self, current: &Product) -> Product {
        Product {
            id: current.id.clone(),
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            category: self.category.clone().unwrap_or_else(|| current.category.clone()),
            subcategory: self
                .subcategory
                .clone()
                .unwrap_or_else(|| current.subcategory.clone()),
            price: self.price.unwrap_or(current.price),
            quantity: self.quantity.unwrap_or(current.quantity),
        }
    }
}

// ============================================================================
// Store
// ============================================================================

/// Starter catalog written when product "1" is missing
fn default_products() -> [Product; 2] {
    [
        Product::new("1", "Lablis", "Women", "Eid Edition", Decimal::from(25700), 10),
        Product::new("2", "T-Shirt", "Men", "Casual", Decimal::from(1500), 20),
    ]
}

/// Application state over one data directory.
#[derive(Debug)]
pub struct Store {
    config: StoreConfig,
    files: DataFiles,
    products: ProductTree,
    orders: OrderHeap,
    customers: CustomerTable,
    sales: SalesTable,
    admins: AdminTable,
    ids: IdCounters,
    cart: Cart,
}

impl Store {
    /// Prepare the data directory and load everything from it.
    ///
    /// # Returns
    ///
    /// * `Err(StoreError::DataDirUnwritable)` - the directory cannot be used
    /// * `Err(StoreError::Config)` - `config` is invalid
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;

        let files = DataFiles::new(&config);
        files.ensure_directories()?;

        let buckets = config.bucket_count;
        let mut store = Self {
            files,
            products: ProductTree::new(),
            orders: OrderHeap::new(),
            customers: CustomerTable::with_buckets(buckets),
            sales: SalesTable::with_buckets(buckets),
            admins: AdminTable::with_buckets(buckets),
            ids: IdCounters::new(),
            cart: Cart::new(),
            config,
        };

        store.load_id_counters();
        store.load_products();
        store.load_orders();
        store.load_customers();
        store.load_sales();
        store.load_admins();

        info!(
            data_dir = ?store.files.root(),
            products = store.products.len(),
            orders = store.orders.len(),
            customers = store.customers.len(),
            "Store opened"
        );

        Ok(store)
    }

    #[inline]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    #[inline]
    pub fn files(&self) -> &DataFiles {
        &self.files
    }

    // ========================================================================
    // Products
    // ========================================================================

    #[inline]
    pub fn products(&self) -> &ProductTree {
        &self.products
    }

    pub fn find_product(&self, id: &str) -> Option<&Product> {
        self.products.find(id)
    }

    /// All products, ascending by id
    pub fn list_products(&self) -> Vec<Product> {
        self.products.get_all()
    }

    /// Products whose category matches exactly, ascending by id
    pub fn products_in_category(&self, category: &str) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect()
    }

    /// Add a new product.
    ///
    /// Rejects an empty id, commas in any text field, negative prices and
    /// ids already in the catalog.
    pub fn add_product(&mut self, product: Product) -> StoreResult<()> {
        require("product id", &product.id)?;
        validate_product(&product)?;
        if self.products.contains(&product.id) {
            return Err(ValidationError::Duplicate {
                field: "product id".to_string(),
                value: product.id,
            }
            .into());
        }

        debug!(product_id = %product.id, "Adding product");
        self.products.insert(product);
        self.save_products();
        Ok(())
    }

    /// Apply a partial update to an existing product.
    ///
    /// The updated record goes through the same checks as a new product.
    /// The old node is removed and the updated record inserted under the
    /// same id.
    pub fn edit_product(&mut self, id: &str, edit: &ProductEdit) -> StoreResult<Product> {
        let current = self
            .products
            .find(id)
            .ok_or_else(|| StoreError::ProductNotFound(id.to_string()))?;

        let updated = edit.apply(current);
        validate_product(&updated)?;

        self.products.remove(id);
        self.products.insert(updated.clone());
        self.save_products();

        debug!(product_id = %id, "Product updated");
        Ok(updated)
    }

    pub fn delete_product(&mut self, id: &str) -> StoreResult<()> {
        if !self.products.remove(id) {
            return Err(StoreError::ProductNotFound(id.to_string()));
        }
        self.save_products();
        debug!(product_id = %id, "Product deleted");
        Ok(())
    }

    // ========================================================================
    // Customers
    // ========================================================================

    #[inline]
    pub fn customers(&self) -> &CustomerTable {
        &self.customers
    }

    pub fn add_customer(&mut self, customer: Customer) -> StoreResult<()> {
        self.customers.add(customer)?;
        self.save_customers();
        Ok(())
    }

    pub fn find_customer(&self, id: &str) -> Option<&Customer> {
        self.customers.find(id)
    }

    pub fn remove_customer(&mut self, id: &str) -> StoreResult<()> {
        if !self.customers.remove(id) {
            return Err(StoreError::CustomerNotFound(id.to_string()));
        }
        self.save_customers();
        Ok(())
    }

    /// All customers in table (bucket) order
    pub fn list_customers(&self) -> Vec<Customer> {
        self.customers.list()
    }

    // ========================================================================
    // Cart
    // ========================================================================

    #[inline]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    #[inline]
    pub fn cart_total(&self) -> Decimal {
        self.cart.total()
    }

    /// Move `quantity` units of a product from stock into the cart.
    ///
    /// Stock is decremented immediately and the catalog saved, so the
    /// units are reserved even if the process exits before checkout. An add
    /// that would overflow the cart is rejected before stock is touched.
    pub fn add_to_cart(&mut self, product_id: &str, quantity: u32) -> StoreResult<()> {
        if quantity == 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }

        let product = self
            .products
            .find_mut(product_id)
            .ok_or_else(|| StoreError::ProductNotFound(product_id.to_string()))?;

        if !product.has_stock(quantity) {
            return Err(StoreError::InsufficientStock {
                product_id: product_id.to_string(),
                available: product.quantity,
                requested: quantity,
            });
        }

        self.cart.add(product, quantity)?;
        product.quantity -= quantity;
        self.save_products();

        debug!(product_id = %product_id, quantity, "Added to cart");
        Ok(())
    }

    /// Empty the cart and return its units to stock.
    ///
    /// Lines whose product has since been deleted are dropped.
    pub fn clear_cart(&mut self) {
        if self.cart.is_empty() {
            return;
        }
        for item in self.cart.items() {
            if let Some(product) = self.products.find_mut(&item.product.id) {
                product.quantity = product.quantity.saturating_add(item.quantity);
            }
        }
        self.cart.clear();
        self.save_products();
    }

    // ========================================================================
    // Orders
    // ========================================================================

    #[inline]
    pub fn orders(&self) -> &OrderHeap {
        &self.orders
    }

    /// Every order, highest total first
    pub fn orders_by_total(&self) -> Vec<Order> {
        self.orders.sorted_desc()
    }

    /// Check out the cart with the current local time.
    pub fn place_order(&mut self, details: CheckoutDetails) -> StoreResult<Order> {
        self.place_order_at(details, Local::now().naive_local())
    }

    /// Check out the cart with an explicit timestamp.
    ///
    /// ## Sequence
    ///
    /// 1. Validate details and check the month's sales can take the total
    /// 2. Issue order and tracking ids (counters saved after each)
    /// 3. Snapshot cart lines, push the order, save orders
    /// 4. Add the total to the month's sales, save sales
    /// 5. Append an `in progress` shipment line
    /// 6. Clear the cart (stock stays taken)
    pub fn place_order_at(&mut self, details: CheckoutDetails, at: NaiveDateTime) -> StoreResult<Order> {
        if self.cart.is_empty() {
            return Err(StoreError::EmptyCart);
        }
        for (field, value) in [
            ("name", &details.name),
            ("address", &details.address),
            ("phone", &details.phone),
        ] {
            require(field, value)?;
            reject_delimiter(field, value)?;
        }

        let timestamp = at.format(TIMESTAMP_FORMAT).to_string();
        let total_price = self.cart.total();
        let month = month_key_from_timestamp(&timestamp);
        if let Some(month) = &month {
            self.sales.total_after(month, total_price)?;
        }

        let order_id = self.ids.issue_order_id();
        self.save_id_counters();
        let tracking_id = self.ids.issue_tracking_id();
        self.save_id_counters();

        let order = Order {
            order_id,
            tracking_id,
            timestamp,
            customer_name: details.name,
            customer_address: details.address,
            customer_phone: details.phone,
            payment_method: details.payment_method,
            items: self.cart.to_order_lines(),
            total_price,
        };

        self.orders.insert(order.clone());
        self.save_orders();

        match month {
            Some(month) => {
                self.sales.add(&month, order.total_price)?;
                self.save_sales();
            }
            None => warn!(order_id = %order.order_id, "Order timestamp has no month"),
        }

        self.append_shipment(&order, STATUS_IN_PROGRESS);
        self.cart.clear();

        info!(
            order_id = %order.order_id,
            tracking_id = %order.tracking_id,
            total = %order.total_price,
            "Order placed"
        );
        Ok(order)
    }

    // ========================================================================
    // Sales
    // ========================================================================

    #[inline]
    pub fn sales(&self) -> &SalesTable {
        &self.sales
    }

    /// Sales total for `MM-YYYY`
    pub fn monthly_sales(&self, month: &str) -> StoreResult<Decimal> {
        validate_month_key(month)?;
        Ok(self.sales.get(month))
    }

    /// Recompute every monthly total from the order history and save.
    pub fn rebuild_sales_from_orders(&mut self) {
        self.sales.rebuild(&self.orders);
        self.save_sales();
        info!(months = self.sales.len(), "Sales rebuilt from orders");
    }

    // ========================================================================
    // Shipments
    // ========================================================================

    /// Count delivered and in-progress shipment lines
    pub fn shipment_tally(&self) -> ShipmentTally {
        let lines = self.files.read_lines(self.files.shipments_path()).unwrap_or_default();
        ShipmentTally::from_lines(lines.iter().map(String::as_str))
    }

    fn append_shipment(&self, order: &Order, status: &str) {
        let line = encode_shipment(
            &order.order_id,
            &order.tracking_id,
            &order.customer_name,
            &order.customer_address,
            status,
        );
        self.files.append(self.files.shipments_path(), &line);
    }

    // ========================================================================
    // Admins
    // ========================================================================

    #[inline]
    pub fn admins(&self) -> &AdminTable {
        &self.admins
    }

    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        self.admins.authenticate(username, password)
    }

    pub fn add_admin(&mut self, username: &str, password: &str, confirm: &str) -> StoreResult<()> {
        self.admins.add(username, password, confirm)?;
        self.save_admins();
        info!(username = %username, "Admin added");
        Ok(())
    }

    // ========================================================================
    // Ids
    // ========================================================================

    #[inline]
    pub fn id_counters(&self) -> &IdCounters {
        &self.ids
    }

    // ========================================================================
    // Loading
    // ========================================================================

    fn load_id_counters(&mut self) {
        let path = self.files.path(ID_COUNTERS_FILE);
        if let Some(first) = self.files.read_lines(&path).and_then(|l| l.into_iter().next()) {
            self.ids = IdCounters::from_line(&first);
        }
    }

    fn load_products(&mut self) {
        let path = self.files.path(PRODUCTS_FILE);
        for line in self.files.read_lines(&path).unwrap_or_default() {
            match decode_product(&line) {
                Ok(product) => {
                    self.products.insert(product);
                }
                Err(err) => warn!(line = %line, error = %err, "Skipping malformed product record"),
            }
        }

        if self.config.seed_defaults && !self.products.contains("1") {
            info!("Seeding default products");
            for product in default_products() {
                self.products.insert(product);
            }
            self.save_products();
        }
    }

    fn load_orders(&mut self) {
        let path = self.files.path(ORDERS_FILE);
        for line in self.files.read_lines(&path).unwrap_or_default() {
            match decode_order(&line) {
                Ok(record) => {
                    let order = self.rebuild_order(record);
                    self.ids.observe(&order.order_id, &order.tracking_id);
                    self.orders.insert(order);
                }
                Err(err) => warn!(line = %line, error = %err, "Skipping malformed order record"),
            }
        }
    }

    /// Resolve an order's `id:qty` items against the current catalog
    fn rebuild_order(&self, record: OrderRecord) -> Order {
        let mut items = LinkedList::new();
        for item in record.item_refs() {
            match item {
                Ok((product_id, quantity)) => match self.products.find(product_id) {
                    Some(product) => items.push_back(OrderLine::new(product.clone(), quantity)),
                    None => warn!(
                        order_id = %record.order_id,
                        product_id = %product_id,
                        "Product not found for order line"
                    ),
                },
                Err(err) => warn!(order_id = %record.order_id, error = %err, "Invalid order line"),
            }
        }

        Order {
            order_id: record.order_id,
            tracking_id: record.tracking_id,
            timestamp: record.timestamp,
            customer_name: record.customer_name,
            customer_address: record.customer_address,
            customer_phone: record.customer_phone,
            payment_method: record.payment_method,
            items,
            total_price: record.total_price,
        }
    }

    fn load_customers(&mut self) {
        let path = self.files.path(CUSTOMERS_FILE);
        if let Some(lines) = self.files.read_lines(&path) {
            self.customers.load_lines(&lines);
        }
    }

    fn load_sales(&mut self) {
        let path = self.files.path(SALES_FILE);
        if let Some(lines) = self.files.read_lines(&path) {
            self.sales.load_lines(&lines);
        }
    }

    fn load_admins(&mut self) {
        let path = self.files.path(ADMINS_FILE);
        if !path.exists() {
            info!("No admin credentials found, creating default admin");
            self.admins.insert_default();
            self.save_admins();
            return;
        }
        if let Some(lines) = self.files.read_lines(&path) {
            self.admins.load_lines(&lines);
        }
    }

    // ========================================================================
    // Saving (whole-file rewrite)
    // ========================================================================

    fn save_products(&self) {
        let path = self.files.path(PRODUCTS_FILE);
        self.files.save(&path, self.products.iter().map(encode_product));
    }

    fn save_orders(&self) {
        let path = self.files.path(ORDERS_FILE);
        self.files.save(&path, self.orders.sorted_desc().iter().map(encode_order));
    }

    fn save_customers(&self) {
        let path = self.files.path(CUSTOMERS_FILE);
        self.files.save(&path, self.customers.encode_lines());
    }

    fn save_sales(&self) {
        let path = self.files.path(SALES_FILE);
        self.files.save(&path, self.sales.encode_lines());
    }

    fn save_admins(&self) {
        let path = self.files.path(ADMINS_FILE);
        self.files.save(&path, self.admins.encode_lines());
    }

    fn save_id_counters(&self) {
        let path = self.files.path(ID_COUNTERS_FILE);
        self.files.save(&path, std::iter::once(self.ids.encode()));
    }
}

// ============================================================================
// Field checks
// ============================================================================

fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Commas would split the record on the next load
fn reject_delimiter(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.contains(',') {
        return Err(ValidationError::ContainsDelimiter {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Checks shared by new and edited products
fn validate_product(product: &Product) -> Result<(), ValidationError> {
    reject_delimiter("product id", &product.id)?;
    reject_delimiter("name", &product.name)?;
    reject_delimiter("category", &product.category)?;
    reject_delimiter("subcategory", &product.subcategory)?;
    if product.price.is_sign_negative() && !product.price.is_zero() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_product() -> Product {
        Product::new("5", "Kurta", "Men", "Eid Edition", Decimal::from(3200), 8)
    }

    #[test]
    fn test_product_edit_blank_keeps_current() {
        let edit = ProductEdit::from_input("", "", "", "", "").unwrap();
        assert_eq!(edit, ProductEdit::default());
        assert_eq!(edit.apply(&create_test_product()), create_test_product());
    }

    #[test]
    fn test_product_edit_applies_fields() {
        let edit = ProductEdit::from_input("Kurta Deluxe", "", "", "3500.5", "2").unwrap();
        let updated = edit.apply(&create_test_product());

        assert_eq!(updated.id, "5");
        assert_eq!(updated.name, "Kurta Deluxe");
        assert_eq!(updated.category, "Men");
        assert_eq!(updated.price, Decimal::new(35005, 1));
        assert_eq!(updated.quantity, 2);
    }

    #[test]
    fn test_product_edit_rejects_bad_numbers() {
        assert!(matches!(
            ProductEdit::from_input("", "", "", "-5", ""),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            ProductEdit::from_input("", "", "", "", "many"),
            Err(ValidationError::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_field_checks() {
        assert!(require("name", "  ").is_err());
        assert!(require("name", "A").is_ok());
        assert!(reject_delimiter("name", "a,b").is_err());

        let mut product = create_test_product();
        product.name = "Kurta, blue".to_string();
        assert!(matches!(
            validate_product(&product),
            Err(ValidationError::ContainsDelimiter { .. })
        ));

        let mut product = create_test_product();
        product.price = Decimal::from(-1);
        assert!(matches!(
            validate_product(&product),
            Err(ValidationError::Negative { .. })
        ));
    }
}
