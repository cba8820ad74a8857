//! Online/offline tracking.
//!
//! Two signals are kept apart: the edge-triggered one, fed by whatever
//! watches the environment through [`ConnectivityMonitor::set_online`], and
//! the polled one, updated by every [`ConnectivityMonitor::probe`] that goes
//! out to the network. They are allowed to disagree.

use std::cell::RefCell;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;
use std::sync::Arc;

use serde::Serialize;

use crate::api_defaults::DEFAULT_PROBE_TIMEOUT_MILLISECONDS;
use crate::http::{Method, Request};
use crate::io::{HttpRunner, Response};
use crate::time::Milliseconds;
use crate::{log_debug, log_info};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Connectivity {
    #[default]
    Unknown,
    Online,
    Offline,
}

impl From<bool> for Connectivity {
    fn from(online: bool) -> Self {
        if online {
            Connectivity::Online
        } else {
            Connectivity::Offline
        }
    }
}

impl Display for Connectivity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Connectivity::Unknown => write!(f, "Unknown"),
            Connectivity::Online => write!(f, "Online"),
            Connectivity::Offline => write!(f, "Offline"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn Fn(Connectivity)>;

/// Environment connectivity flag with change notifications.
pub trait ConnectivitySignal {
    /// Anything other than a known offline state counts as online.
    fn is_online(&self) -> bool;
    /// `listener` is called with the new state on every transition.
    fn subscribe(&self, listener: Listener) -> SubscriptionId;
    /// `false` if `id` was not subscribed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

#[derive(Clone, Copy, Debug)]
pub struct ProbeOptions {
    /// Confirm with a request to the API. Without it only the environment
    /// flag is reported.
    pub ping: bool,
    pub timeout: Milliseconds,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        ProbeOptions {
            ping: true,
            timeout: Milliseconds::new(DEFAULT_PROBE_TIMEOUT_MILLISECONDS),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ConnectivityResult {
    pub online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Display for ConnectivityResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (self.online, self.status, &self.error) {
            (true, Some(status), _) => write!(f, "Online (HTTP {status})"),
            (true, None, _) => write!(f, "Online"),
            (false, _, Some(error)) => write!(f, "Offline: {error}"),
            (false, _, None) => write!(f, "Offline"),
        }
    }
}

pub struct ConnectivityMonitor<R> {
    base_url: String,
    runner: Arc<R>,
    edge: RefCell<Connectivity>,
    polled: RefCell<Connectivity>,
    listeners: RefCell<Vec<(SubscriptionId, Rc<dyn Fn(Connectivity)>)>>,
    next_id: RefCell<u64>,
}

impl<R> ConnectivityMonitor<R> {
    pub fn new(base_url: &str, runner: Arc<R>) -> Self {
        ConnectivityMonitor {
            base_url: base_url.to_string(),
            runner,
            edge: RefCell::new(Connectivity::Unknown),
            polled: RefCell::new(Connectivity::Unknown),
            listeners: RefCell::new(Vec::new()),
            next_id: RefCell::new(0),
        }
    }

    /// Environment reported a connectivity change. Listeners only hear about
    /// actual transitions, repeated reports of the same state are dropped.
    pub fn set_online(&self, online: bool) {
        let next = Connectivity::from(online);
        let previous = self.edge.replace(next);
        if previous == next {
            return;
        }
        log_info!("Connectivity changed from {} to {}", previous, next);
        // Listeners may subscribe or unsubscribe while being notified, so
        // dispatch over a snapshot. Ones added now hear the next transition.
        let snapshot: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (*id, listener.clone()))
            .collect();
        for (id, listener) in snapshot {
            // Skip the ones removed by an earlier listener in this round.
            let subscribed = self.is_subscribed(id);
            if subscribed {
                listener(next);
            }
        }
    }

    pub fn edge_state(&self) -> Connectivity {
        *self.edge.borrow()
    }

    pub fn polled_state(&self) -> Connectivity {
        *self.polled.borrow()
    }

    fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.listeners
            .borrow()
            .iter()
            .any(|(listener_id, _)| *listener_id == id)
    }
}

impl<R> ConnectivitySignal for ConnectivityMonitor<R> {
    fn is_online(&self) -> bool {
        self.edge_state() != Connectivity::Offline
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let mut next_id = self.next_id.borrow_mut();
        let id = SubscriptionId(*next_id);
        *next_id += 1;
        self.listeners.borrow_mut().push((id, Rc::from(listener)));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }
}

impl<R: HttpRunner<Response = Response>> ConnectivityMonitor<R> {
    /// Never fails, problems reaching the API are reported as offline.
    pub fn probe(&self, options: ProbeOptions) -> ConnectivityResult {
        if !options.ping {
            return ConnectivityResult {
                online: self.is_online(),
                ..Default::default()
            };
        }
        let mut request =
            Request::<()>::new(&self.base_url, Method::HEAD).with_timeout(options.timeout);
        let result = match self.runner.run(&mut request) {
            Ok(response) => ConnectivityResult {
                online: true,
                status: Some(response.status),
                error: None,
            },
            Err(err) => ConnectivityResult {
                online: false,
                status: None,
                error: Some(err.to_string()),
            },
        };
        log_debug!("Probe of {}: {}", self.base_url, result);
        self.polled.replace(Connectivity::from(result.online));
        result
    }
}
