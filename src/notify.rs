//! In-process notification hub.
//!
//! Connected clients subscribe to three feeds: the everyone channel, their
//! role-group channel (Admin/Manager/Employee) and a personal channel keyed
//! by user id. Delivery is best-effort and lossy under lag, matching a
//! broadcast bus: slow consumers drop the oldest events.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;
use tokio::sync::broadcast;

use crate::model::role::Role;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// "notification" for human-readable messages, "system_update" for
    /// coarse "this entity set changed" pings clients use to refetch.
    pub event: &'static str,
    pub message: String,
}

impl Event {
    pub fn notification(message: impl Into<String>) -> Self {
        Self {
            event: "notification",
            message: message.into(),
        }
    }

    pub fn system_update(entity: impl Into<String>) -> Self {
        Self {
            event: "system_update",
            message: entity.into(),
        }
    }

    /// Render as a server-sent-events frame.
    pub fn sse_frame(&self) -> String {
        format!(
            "event: {}\ndata: {}\n\n",
            self.event,
            serde_json::json!({ "message": self.message })
        )
    }
}

pub struct Subscription {
    pub all: broadcast::Receiver<Event>,
    pub group: broadcast::Receiver<Event>,
    pub personal: broadcast::Receiver<Event>,
}

pub struct NotificationHub {
    all: broadcast::Sender<Event>,
    admin: broadcast::Sender<Event>,
    manager: broadcast::Sender<Event>,
    employee: broadcast::Sender<Event>,
    users: RwLock<HashMap<u64, broadcast::Sender<Event>>>,
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationHub {
    pub fn new() -> Self {
        let (all, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (admin, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (manager, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (employee, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            all,
            admin,
            manager,
            employee,
            users: RwLock::new(HashMap::new()),
        }
    }

    fn group_sender(&self, role: Role) -> &broadcast::Sender<Event> {
        match role {
            Role::Admin => &self.admin,
            Role::Manager => &self.manager,
            Role::Employee => &self.employee,
        }
    }

    /// Register a connection for its role group and personal feed.
    pub fn subscribe(&self, role: Role, user_id: u64) -> Subscription {
        let personal = self
            .users
            .write()
            .expect("notification hub poisoned")
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe();

        Subscription {
            all: self.all.subscribe(),
            group: self.group_sender(role).subscribe(),
            personal,
        }
    }

    /// Broadcast to every connected client.
    pub fn notify_all(&self, message: impl Into<String>) {
        let _ = self.all.send(Event::notification(message));
    }

    /// Coarse "something changed" ping to every connected client.
    pub fn system_update(&self, entity: impl Into<String>) {
        let _ = self.all.send(Event::system_update(entity));
    }

    /// Privacy-aware fan-out: only the Admin and Manager groups see it.
    pub fn notify_admins_and_managers(&self, message: impl Into<String>) {
        let event = Event::notification(message);
        let _ = self.admin.send(event.clone());
        let _ = self.manager.send(event);
    }

    /// Targeted message for a single user. Dropped if they are not connected.
    pub fn notify_user(&self, user_id: u64, message: impl Into<String>) {
        let users = self.users.read().expect("notification hub poisoned");
        if let Some(sender) = users.get(&user_id) {
            let _ = sender.send(Event::notification(message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn group_fanout_respects_roles() {
        let hub = NotificationHub::new();
        let mut manager_sub = hub.subscribe(Role::Manager, 1);
        let mut employee_sub = hub.subscribe(Role::Employee, 2);

        hub.notify_admins_and_managers("new leave request");

        let got = manager_sub.group.recv().await.unwrap();
        assert_eq!(got.message, "new leave request");
        assert!(employee_sub.group.try_recv().is_err());
    }

    #[tokio::test]
    async fn system_update_reaches_everyone() {
        let hub = NotificationHub::new();
        let mut a = hub.subscribe(Role::Admin, 1);
        let mut b = hub.subscribe(Role::Employee, 2);

        hub.system_update("LeaveRequests");

        assert_eq!(a.all.recv().await.unwrap().event, "system_update");
        assert_eq!(b.all.recv().await.unwrap().message, "LeaveRequests");
    }

    #[tokio::test]
    async fn personal_messages_hit_one_user() {
        let hub = NotificationHub::new();
        let mut target = hub.subscribe(Role::Employee, 5);
        let mut other = hub.subscribe(Role::Employee, 6);

        hub.notify_user(5, "your leave was approved");

        assert_eq!(
            target.personal.recv().await.unwrap().message,
            "your leave was approved"
        );
        assert!(other.personal.try_recv().is_err());
    }

    #[test]
    fn sse_frame_shape() {
        let frame = Event::system_update("Employees").sse_frame();
        assert_eq!(
            frame,
            "event: system_update\ndata: {\"message\":\"Employees\"}\n\n"
        );
    }
}
