//! MailBox: synchronous publish/subscribe between systems
//!
//! Handlers are keyed by message kind and run in registration order. A handler
//! receives the message and the scene that sent it, so it may add or remove
//! entities and components while the message is being delivered.
//!
//! Delivery is immediate ([`MailBox::send`]) or deferred to the next frame
//! boundary ([`MailBox::post`]). Systems only see the mailbox during `init` and
//! `focus`, so anything they want to say from `update` has to be posted.

use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use crate::scene::Scene;

/// Name of a message kind, e.g. `"Keyboard"`
pub type MessageKind = &'static str;

/// Payload delivered through the mailbox
pub trait Message: 'static {
    /// Kind name handlers are registered under
    const KIND: MessageKind;
}

type Handler = Rc<dyn Fn(&dyn Any, &mut Scene)>;

struct Envelope {
    kind: MessageKind,
    payload: Box<dyn Any>,
}

#[derive(Default)]
struct Inner {
    listeners: HashMap<MessageKind, Vec<Handler>>,
    posted: VecDeque<Envelope>,
    generation: u64,
}

/// Explicitly owned message bus
///
/// Cloning yields another handle to the same bus. The window opens a fresh
/// session on every scene focus, dropping all listeners and pending posts.
#[derive(Clone, Default)]
pub struct MailBox {
    inner: Rc<RefCell<Inner>>,
}

impl MailBox {
    /// Create an empty, detached mailbox
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for messages of type `M`
    ///
    /// A handler may send its own kind again and will then be re-entered, so
    /// it keeps its state in `Cell`/`RefCell` and does not hold borrows across
    /// a send.
    pub fn listen<M: Message>(&self, handler: impl Fn(&M, &mut Scene) + 'static) {
        let erased: Handler = Rc::new(move |payload: &dyn Any, scene: &mut Scene| {
            match payload.downcast_ref::<M>() {
                Some(message) => handler(message, scene),
                None => log::warn!(
                    "Message registered as '{}' has an unexpected payload type",
                    M::KIND
                ),
            }
        });
        self.inner
            .borrow_mut()
            .listeners
            .entry(M::KIND)
            .or_default()
            .push(erased);
    }

    /// Deliver a message to every handler registered for its kind, in order
    ///
    /// Returns once all handlers have run. Sending a kind with no handlers is a
    /// no-op. Handlers registered while the message is being delivered only
    /// see later sends.
    pub fn send<M: Message>(&self, message: &M, scene: &mut Scene) {
        self.dispatch(M::KIND, message, scene);
    }

    /// Queue a message for the next frame boundary
    pub fn post<M: Message>(&self, message: M) {
        self.inner.borrow_mut().posted.push_back(Envelope {
            kind: M::KIND,
            payload: Box::new(message),
        });
    }

    /// Drop every listener and pending post
    ///
    /// Handlers still queued for a message being delivered are skipped.
    pub fn open(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.listeners.clear();
        inner.posted.clear();
        inner.generation += 1;
    }

    /// Number of handlers registered for a kind
    pub fn listener_count(&self, kind: MessageKind) -> usize {
        self.inner.borrow().listeners.get(kind).map_or(0, Vec::len)
    }

    /// Number of posted messages awaiting delivery
    pub fn pending(&self) -> usize {
        self.inner.borrow().posted.len()
    }

    /// Whether both handles refer to the same bus
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn deliver_posted(&self, scene: &mut Scene) -> usize {
        let batch = std::mem::take(&mut self.inner.borrow_mut().posted);
        let count = batch.len();
        for envelope in batch {
            self.dispatch(envelope.kind, &*envelope.payload, scene);
        }
        count
    }

    fn dispatch(&self, kind: MessageKind, payload: &dyn Any, scene: &mut Scene) {
        // Snapshot, so handlers can reach the mailbox while they run
        let (handlers, generation) = {
            let inner = self.inner.borrow();
            match inner.listeners.get(kind) {
                Some(handlers) if !handlers.is_empty() => (handlers.clone(), inner.generation),
                _ => {
                    log::trace!("No listeners for '{}'", kind);
                    return;
                }
            }
        };

        for handler in handlers {
            if self.inner.borrow().generation != generation {
                log::trace!("Mailbox reopened while delivering '{}'", kind);
                break;
            }
            handler(payload, scene);
        }
    }
}

impl fmt::Debug for MailBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MailBox")
            .field("kinds", &inner.listeners.len())
            .field("pending", &inner.posted.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct PingMessage(u32);
    impl Message for PingMessage {
        const KIND: MessageKind = "Ping";
    }

    struct PongMessage;
    impl Message for PongMessage {
        const KIND: MessageKind = "Pong";
    }

    fn recorder() -> (Rc<RefCell<Vec<String>>>, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        (Rc::clone(&log), log)
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let mailbox = MailBox::new();
        let mut scene = Scene::new("test");
        let (log, seen) = recorder();

        for name in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            mailbox.listen(move |ping: &PingMessage, _| {
                log.borrow_mut().push(format!("{name}:{}", ping.0));
            });
        }
        mailbox.send(&PingMessage(4), &mut scene);

        assert_eq!(*seen.borrow(), ["first:4", "second:4", "third:4"]);
    }

    #[test]
    fn test_send_without_listeners_is_noop() {
        let mailbox = MailBox::new();
        let mut scene = Scene::new("test");
        mailbox.send(&PongMessage, &mut scene);
        assert_eq!(mailbox.listener_count("Pong"), 0);
    }

    #[test]
    fn test_open_drops_listeners_and_posts() {
        let mailbox = MailBox::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        mailbox.listen(move |_: &PingMessage, _| counter.set(counter.get() + 1));
        mailbox.post(PingMessage(1));

        mailbox.open();

        let mut scene = Scene::new("test");
        mailbox.send(&PingMessage(2), &mut scene);
        assert_eq!(hits.get(), 0);
        assert_eq!(mailbox.pending(), 0);
    }

    #[test]
    fn test_listen_during_dispatch_applies_to_later_sends() {
        let mailbox = MailBox::new();
        let mut scene = Scene::new("test");
        let hits = Rc::new(Cell::new(0));

        let bus = mailbox.clone();
        let counter = Rc::clone(&hits);
        mailbox.listen(move |_: &PingMessage, _| {
            let counter = Rc::clone(&counter);
            bus.listen(move |_: &PingMessage, _| counter.set(counter.get() + 1));
        });

        mailbox.send(&PingMessage(0), &mut scene);
        assert_eq!(hits.get(), 0);
        assert_eq!(mailbox.listener_count("Ping"), 2);

        mailbox.send(&PingMessage(0), &mut scene);
        assert_eq!(hits.get(), 1);
        assert_eq!(mailbox.listener_count("Ping"), 3);
    }

    #[test]
    fn test_handler_can_send_other_kind() {
        let mailbox = MailBox::new();
        let mut scene = Scene::new("test");
        let (log, seen) = recorder();

        let bus = mailbox.clone();
        let ping_log = Rc::clone(&log);
        mailbox.listen(move |_: &PingMessage, scene| {
            ping_log.borrow_mut().push("ping".to_string());
            bus.send(&PongMessage, scene);
        });
        mailbox.listen(move |_: &PongMessage, _| log.borrow_mut().push("pong".to_string()));

        mailbox.send(&PingMessage(0), &mut scene);

        assert_eq!(*seen.borrow(), ["ping", "pong"]);
    }

    #[test]
    fn test_handler_reenters_on_own_kind() {
        let mailbox = MailBox::new();
        let mut scene = Scene::new("test");
        let (log, seen) = recorder();

        let bus = mailbox.clone();
        let countdown_log = Rc::clone(&log);
        mailbox.listen(move |ping: &PingMessage, scene| {
            countdown_log.borrow_mut().push(format!("countdown:{}", ping.0));
            if ping.0 > 0 {
                bus.send(&PingMessage(ping.0 - 1), scene);
            }
        });
        mailbox.listen(move |ping: &PingMessage, _| {
            log.borrow_mut().push(format!("tail:{}", ping.0));
        });

        mailbox.send(&PingMessage(2), &mut scene);

        assert_eq!(
            *seen.borrow(),
            ["countdown:2", "countdown:1", "countdown:0", "tail:0", "tail:1", "tail:2"]
        );
        assert_eq!(mailbox.listener_count("Ping"), 2);
    }

    #[test]
    fn test_open_during_dispatch_skips_remaining_handlers() {
        let mailbox = MailBox::new();
        let mut scene = Scene::new("test");
        let hits = Rc::new(Cell::new(0));

        let bus = mailbox.clone();
        mailbox.listen(move |_: &PingMessage, _| bus.open());
        let counter = Rc::clone(&hits);
        mailbox.listen(move |_: &PingMessage, _| counter.set(counter.get() + 1));
        mailbox.send(&PingMessage(0), &mut scene);

        assert_eq!(hits.get(), 0);
        assert_eq!(mailbox.listener_count("Ping"), 0);
    }

    #[test]
    fn test_posted_messages_wait_for_delivery() {
        let mailbox = MailBox::new();
        let mut scene = Scene::new("test");
        let (log, seen) = recorder();

        mailbox.listen(move |ping: &PingMessage, _| log.borrow_mut().push(ping.0.to_string()));
        mailbox.post(PingMessage(1));
        mailbox.post(PingMessage(2));
        assert!(seen.borrow().is_empty());

        assert_eq!(mailbox.deliver_posted(&mut scene), 2);
        assert_eq!(*seen.borrow(), ["1", "2"]);
        assert_eq!(mailbox.pending(), 0);
    }

    #[test]
    fn test_handler_mutates_scene() {
        let mailbox = MailBox::new();
        let mut scene = Scene::new("test");

        mailbox.listen(|_: &PingMessage, scene: &mut Scene| {
            scene.add_entity(crate::ecs::Entity::new());
        });
        mailbox.send(&PingMessage(0), &mut scene);
        mailbox.send(&PingMessage(0), &mut scene);

        assert_eq!(scene.entity_count(), 2);
    }
}
