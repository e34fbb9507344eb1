//! In-memory stand-in for the `manage` stored procedures.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::{AppError, AppResult};
use crate::models::{UpdateUser, User};
use crate::procedure::{ProcedureCall, ProcedureExecutor, ProcedureResult, SqlValue};

#[derive(serde::Serialize)]
struct StoredProduct {
    product_id: i32,
    product_itemnum: String,
    customer_type: Option<i32>,
    unit_id: i32,
}

#[derive(Default)]
struct Tables {
    products: Vec<StoredProduct>,
    users: Vec<User>,
    next_product_id: i32,
}

/// Records every call and emulates the product and user procedures.
pub struct InMemoryProcedures {
    tables: Mutex<Tables>,
    calls: Mutex<Vec<ProcedureCall>>,
    failing: AtomicBool,
    report_writes: AtomicBool,
}

impl Default for InMemoryProcedures {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProcedures {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables {
                next_product_id: 1,
                ..Tables::default()
            }),
            calls: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            report_writes: AtomicBool::new(true),
        }
    }

    /// Makes every subsequent call fail like a lost connection.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// When off, write procedures emit no affected-row report.
    pub fn set_report_writes(&self, report: bool) {
        self.report_writes.store(report, Ordering::SeqCst);
    }

    pub fn insert_product(&self, itemnum: &str, customer_type: Option<i32>, unit_id: i32) -> i32 {
        let mut tables = self.tables.lock().unwrap();
        let product_id = tables.next_product_id;
        tables.next_product_id += 1;
        tables.products.push(StoredProduct {
            product_id,
            product_itemnum: itemnum.to_string(),
            customer_type,
            unit_id,
        });
        product_id
    }

    pub fn insert_user(&self, user: User) {
        self.tables.lock().unwrap().users.push(user);
    }

    pub fn calls(&self) -> Vec<ProcedureCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<ProcedureCall> {
        self.calls.lock().unwrap().last().cloned()
    }

    fn report(&self, result: &mut ProcedureResult, affected: u64) {
        if self.report_writes.load(Ordering::SeqCst) {
            result.rows_affected.push(affected);
        }
    }

    fn run(&self, call: &ProcedureCall) -> AppResult<ProcedureResult> {
        let mut tables = self.tables.lock().unwrap();
        let mut result = ProcedureResult::new(call.qualified_name());
        let int = |name: &str| call.param(name).and_then(SqlValue::as_int);

        match call.name() {
            "usp_get_products_spotlight" => {
                if !tables.products.is_empty() {
                    for product in &tables.products {
                        result.push_record(0, to_record(product));
                    }
                    result.push_record(1, json!({"customer_type": 5, "description": "Retail"}));
                    result.push_record(1, json!({"customer_type": 6, "description": "Wholesale"}));
                    result.push_record(2, json!({"unit_id": 2, "description": "Box"}));
                }
            }
            "usp_post_products_spotlight" => {
                let product = StoredProduct {
                    product_id: tables.next_product_id,
                    product_itemnum: payload_itemnum(call),
                    customer_type: int("payload_customer_type"),
                    unit_id: int("payload_unit_id").unwrap_or_default(),
                };
                tables.next_product_id += 1;
                result.push_record(0, to_record(&product));
                tables.products.push(product);
                self.report(&mut result, 1);
            }
            "usp_put_products_spotlight" => {
                let product_id = int("product_id");
                let customer_type = int("customer_type");
                let mut affected = 0;
                for product in tables.products.iter_mut().filter(|p| {
                    Some(p.product_id) == product_id && p.customer_type == customer_type
                }) {
                    product.product_itemnum = payload_itemnum(call);
                    product.customer_type = int("payload_customer_type");
                    product.unit_id = int("payload_unit_id").unwrap_or_default();
                    if affected == 0 {
                        result.push_record(0, to_record(product));
                    }
                    affected += 1;
                }
                self.report(&mut result, affected);
            }
            "usp_delete_products_spotlight" => {
                let product_id = int("product_id");
                let customer_type = int("customer_type");
                let before = tables.products.len();
                tables.products.retain(|p| {
                    !(Some(p.product_id) == product_id && p.customer_type == customer_type)
                });
                let removed = (before - tables.products.len()) as u64;
                self.report(&mut result, removed);
            }
            "usp_get_users" => {
                let id = int("id");
                for user in tables.users.iter().filter(|u| id.is_none_or(|id| u.id == id)) {
                    result.push_record(0, to_record(user));
                }
            }
            "usp_put_user" => {
                let id = int("id");
                let update = update_from_call(call);
                let mut affected = 0;
                for user in tables.users.iter_mut().filter(|u| Some(u.id) == id) {
                    apply_update(user, update.clone());
                    affected += 1;
                }
                self.report(&mut result, affected);
            }
            other => {
                return Err(AppError::Internal {
                    source: anyhow::anyhow!("unknown procedure {other}"),
                });
            }
        }

        Ok(result)
    }
}

#[async_trait]
impl ProcedureExecutor for InMemoryProcedures {
    async fn execute(&self, call: ProcedureCall) -> AppResult<ProcedureResult> {
        self.calls.lock().unwrap().push(call.clone());

        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::procedure(
                call.qualified_name(),
                diesel::result::Error::BrokenTransactionManager,
            ));
        }

        self.run(&call)
    }

    async fn ping(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::ConnectionPool {
                source: anyhow::anyhow!("connection refused"),
            });
        }
        Ok(())
    }
}

fn to_record<T: serde::Serialize>(row: &T) -> Value {
    serde_json::to_value(row).unwrap()
}

fn payload_itemnum(call: &ProcedureCall) -> String {
    call.param("payload_product_itemnum")
        .and_then(SqlValue::as_str)
        .unwrap_or_default()
        .to_string()
}

fn update_from_call(call: &ProcedureCall) -> UpdateUser {
    let text = |name: &str| call.param(name).and_then(SqlValue::as_str).map(str::to_string);
    let flag = |name: &str| call.param(name).and_then(SqlValue::as_bool).unwrap_or_default();
    let int = |name: &str| call.param(name).and_then(SqlValue::as_int).unwrap_or_default();

    UpdateUser {
        username: text("username").unwrap_or_default(),
        usercode: int("usercode"),
        given_name: text("given_name").unwrap_or_default(),
        family_name: text("family_name").unwrap_or_default(),
        phone_number: text("phone_number"),
        phone_number_verified: flag("phone_number_verified"),
        email_verified: flag("email_verified"),
        marketing_notifications: flag("marketing_notifications"),
        accepted_terms: call.param("accepted_terms").and_then(SqlValue::as_timestamp),
        accepted_terms_version: int("accepted_terms_version"),
        active: flag("active"),
    }
}

fn apply_update(user: &mut User, update: UpdateUser) {
    user.username = update.username;
    user.usercode = update.usercode;
    user.given_name = update.given_name;
    user.family_name = update.family_name;
    user.phone_number = update.phone_number;
    user.phone_number_verified = update.phone_number_verified;
    user.email_verified = update.email_verified;
    user.marketing_notifications = update.marketing_notifications;
    user.accepted_terms = update.accepted_terms;
    user.accepted_terms_version = update.accepted_terms_version;
    user.active = update.active;
}

pub fn sample_user(id: i32, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        usercode: 1000 + id,
        customer_id: Some(10),
        address_id: Some(20),
        cart_available: true,
        given_name: "Given".to_string(),
        family_name: "Family".to_string(),
        phone_number: None,
        phone_number_verified: false,
        email_verified: true,
        last_authenticated_on: None,
        marketing_notifications: false,
        accepted_terms: None,
        accepted_terms_version: 1,
        created: jiff::Timestamp::UNIX_EPOCH,
        modified: None,
        active: true,
    }
}

pub fn sample_update(username: &str) -> UpdateUser {
    UpdateUser {
        username: username.to_string(),
        usercode: 2001,
        given_name: "Caroline".to_string(),
        family_name: "Example".to_string(),
        phone_number: Some("+3212345678".to_string()),
        phone_number_verified: true,
        email_verified: true,
        marketing_notifications: true,
        accepted_terms: Some(jiff::Timestamp::UNIX_EPOCH),
        accepted_terms_version: 3,
        active: true,
    }
}
