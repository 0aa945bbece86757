//! Operation lifecycle events and explicit handler registration.
//!
//! # Responsibility
//! - Define events fired after find/delete operations complete.
//! - Keep an ordered handler list per event name, owned by one operation.
//!
//! # Invariants
//! - Handlers run synchronously, in list order, after the operation's I/O.
//! - There is no process-wide bus; dispatchers are never shared.

use crate::model::person_type::PersonType;
use crate::operation::result::DeleteResultSnapshot;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

/// Fired by single/multi find operations.
pub const DO_FIND_EVENT: &str = "DO_FIND";
/// Fired by the multi delete operation.
pub const DO_DELETE_EVENT: &str = "DO_DELETE";

/// Payload of [`DO_FIND_EVENT`].
///
/// Multi find carries the full result list. Single find carries the rows
/// left over after the returned entity was taken, which is normally empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindOperationEvent {
    pub dto_list: Vec<PersonType>,
}

/// Payload of [`DO_DELETE_EVENT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOperationEvent {
    pub result: DeleteResultSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationEvent {
    Find(FindOperationEvent),
    Delete(DeleteOperationEvent),
}

/// What a handler sees when it is invoked.
#[derive(Debug)]
pub struct EventContext<'a> {
    pub name: &'a str,
    pub event: &'a OperationEvent,
    /// Data attached when the handler was registered.
    pub data: Option<&'a serde_json::Value>,
}

pub type EventHandler = Box<dyn Fn(&EventContext<'_>)>;

struct Registration {
    handler: EventHandler,
    data: Option<serde_json::Value>,
}

/// Maps event names to ordered handler lists.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: BTreeMap<String, Vec<Registration>>,
}

impl Debug for EventDispatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let counts: BTreeMap<&str, usize> = self
            .handlers
            .iter()
            .map(|(name, list)| (name.as_str(), list.len()))
            .collect();
        f.debug_struct("EventDispatcher")
            .field("handlers", &counts)
            .finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `name`.
    ///
    /// `append = true` adds the handler after existing ones; `append = false`
    /// puts it first.
    pub fn on<F>(&mut self, name: &str, handler: F, data: Option<serde_json::Value>, append: bool)
    where
        F: Fn(&EventContext<'_>) + 'static,
    {
        let registration = Registration {
            handler: Box::new(handler),
            data,
        };
        let list = self.handlers.entry(name.to_string()).or_default();
        if append {
            list.push(registration);
        } else {
            list.insert(0, registration);
        }
    }

    /// Removes every handler for `name`. Returns whether any was removed.
    pub fn off(&mut self, name: &str) -> bool {
        self.handlers.remove(name).is_some()
    }

    pub fn has_handlers(&self, name: &str) -> bool {
        self.handlers.get(name).is_some_and(|list| !list.is_empty())
    }

    /// Invokes the handlers registered for `name`.
    pub fn trigger(&self, name: &str, event: &OperationEvent) {
        let Some(list) = self.handlers.get(name) else {
            return;
        };
        for registration in list {
            let context = EventContext {
                name,
                event,
                data: registration.data.as_ref(),
            };
            (registration.handler)(&context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EventDispatcher, FindOperationEvent, OperationEvent, DO_FIND_EVENT};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn empty_find() -> OperationEvent {
        OperationEvent::Find(FindOperationEvent {
            dto_list: Vec::new(),
        })
    }

    #[test]
    fn handlers_run_in_registration_order_and_prepend_when_not_appending() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();

        for label in ["first", "second"] {
            let calls = Rc::clone(&calls);
            dispatcher.on(
                DO_FIND_EVENT,
                move |_| calls.borrow_mut().push(label),
                None,
                true,
            );
        }
        let front = Rc::clone(&calls);
        dispatcher.on(
            DO_FIND_EVENT,
            move |_| front.borrow_mut().push("front"),
            None,
            false,
        );

        dispatcher.trigger(DO_FIND_EVENT, &empty_find());
        assert_eq!(*calls.borrow(), vec!["front", "first", "second"]);
    }

    #[test]
    fn handler_receives_registration_data() {
        let seen = Rc::new(RefCell::new(None));
        let mut dispatcher = EventDispatcher::new();
        let sink = Rc::clone(&seen);
        dispatcher.on(
            DO_FIND_EVENT,
            move |ctx| *sink.borrow_mut() = ctx.data.cloned(),
            Some(json!({ "source": "audit" })),
            true,
        );

        dispatcher.trigger(DO_FIND_EVENT, &empty_find());
        assert_eq!(*seen.borrow(), Some(json!({ "source": "audit" })));
    }

    #[test]
    fn off_removes_handlers_and_unknown_events_are_ignored() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.on(DO_FIND_EVENT, |_| panic!("must not run"), None, true);
        assert!(dispatcher.has_handlers(DO_FIND_EVENT));

        assert!(dispatcher.off(DO_FIND_EVENT));
        assert!(!dispatcher.has_handlers(DO_FIND_EVENT));
        dispatcher.trigger(DO_FIND_EVENT, &empty_find());
        dispatcher.trigger("UNKNOWN", &empty_find());
    }
}
