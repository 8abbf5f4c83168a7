#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::oneshot;
use users_ox::{
    Account, Address, ListFilter, ListResponse, Pagination, User, UserId, UserStatus, UsersApi,
    UsersRequestError,
};

type ListResponder = Box<dyn Fn(&ListFilter) -> Result<ListResponse, UsersRequestError> + Send + Sync>;
type UserResponder = Box<dyn Fn(UserId) -> Result<User, UsersRequestError> + Send + Sync>;

/// In-memory `UsersApi` that records every call and can hold list requests
/// back until a test releases them.
pub struct ScriptedApi {
    list: ListResponder,
    user: UserResponder,
    list_calls: Mutex<Vec<ListFilter>>,
    user_calls: AtomicUsize,
    gates: Mutex<HashMap<u32, oneshot::Receiver<()>>>,
}

impl ScriptedApi {
    pub fn new(
        list: impl Fn(&ListFilter) -> Result<ListResponse, UsersRequestError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            list: Box::new(list),
            user: Box::new(|id| Err(UsersRequestError::NotFound { id })),
            list_calls: Mutex::new(Vec::new()),
            user_calls: AtomicUsize::new(0),
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_users(
        mut self,
        user: impl Fn(UserId) -> Result<User, UsersRequestError> + Send + Sync + 'static,
    ) -> Self {
        self.user = Box::new(user);
        self
    }

    /// Hold list requests for `page` until the returned sender fires.
    pub fn gate_page(&self, page: u32) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(page, rx);
        tx
    }

    pub fn list_calls(&self) -> Vec<ListFilter> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
    }

    pub fn user_call_count(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UsersApi for ScriptedApi {
    async fn list_users(&self, filter: &ListFilter) -> Result<ListResponse, UsersRequestError> {
        self.list_calls.lock().unwrap().push(filter.clone());
        let gate = self.gates.lock().unwrap().remove(&filter.page);
        if let Some(gate) = gate {
            gate.await.expect("gate sender dropped");
        }
        (self.list)(filter)
    }

    async fn get_user(&self, id: UserId) -> Result<User, UsersRequestError> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        (self.user)(id)
    }
}

pub fn user(id: u64, first: &str, last: &str, status: UserStatus) -> User {
    User {
        id: UserId(id),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}@example.com", first.to_lowercase()),
        status,
        created_at: "2024-03-05T10:00:00Z".parse().unwrap(),
        updated_at: "2024-03-05T10:00:00Z".parse().unwrap(),
        address: Address {
            street: "1 Main St".to_string(),
            city: "Town".to_string(),
            zip: "00000".to_string(),
            country: "X".to_string(),
        },
        account: Account {
            balance: 0.0,
            currency: "USD".to_string(),
        },
    }
}

pub fn page_of(filter: &ListFilter, items: Vec<User>, total: u64) -> ListResponse {
    ListResponse {
        items,
        pagination: Pagination {
            total,
            page: filter.page,
            page_size: filter.page_size,
        },
    }
}

pub fn server_error(message: &str) -> UsersRequestError {
    UsersRequestError::Transport {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: message.to_string(),
    }
}

/// Counts served per status probe: total 10, active 6, inactive 3, pending 1.
pub fn stats_fixture(filter: &ListFilter) -> Result<ListResponse, UsersRequestError> {
    let total = match filter.status {
        None => 10,
        Some(UserStatus::Active) => 6,
        Some(UserStatus::Inactive) => 3,
        Some(UserStatus::Pending) => 1,
    };
    Ok(page_of(filter, Vec::new(), total))
}
