//! Unit tests for ak-notify.

use std::rc::Rc;

use crate::{Attachment, Notifier};

// ── Helpers ───────────────────────────────────────────────────────────────────

trait Named {
    fn name(&self) -> &'static str;
}

struct Obs {
    attachment: Attachment<dyn Named>,
    name: &'static str,
}

impl Named for Obs {
    fn name(&self) -> &'static str {
        self.name
    }
}

fn obs(name: &'static str) -> Rc<Obs> {
    Rc::new(Obs { attachment: Attachment::new(), name })
}

fn attach(o: &Rc<Obs>, notifier: &Notifier<dyn Named>) {
    let obs: Rc<dyn Named> = o.clone();
    o.attachment.attach(notifier, Rc::downgrade(&obs));
}

fn names(notifier: &Notifier<dyn Named>) -> Vec<&'static str> {
    notifier.snapshot().iter().map(|o| o.name()).collect()
}

// ── Notifier roster ───────────────────────────────────────────────────────────

#[cfg(test)]
mod roster {
    use super::*;

    #[test]
    fn snapshot_preserves_attachment_order() {
        let notifier = Notifier::new();
        let (a, b, c) = (obs("a"), obs("b"), obs("c"));
        attach(&a, &notifier);
        attach(&b, &notifier);
        attach(&c, &notifier);

        assert_eq!(names(&notifier), vec!["a", "b", "c"]);
        assert_eq!(notifier.len(), 3);
    }

    #[test]
    fn empty_roster() {
        let notifier: Notifier<dyn Named> = Notifier::new();
        assert!(notifier.is_empty());
        assert!(notifier.snapshot().is_empty());
    }

    #[test]
    fn snapshot_does_not_keep_observers_alive() {
        let notifier = Notifier::new();
        let a = obs("a");
        attach(&a, &notifier);

        let snap = notifier.snapshot();
        assert_eq!(Rc::strong_count(&a), 2); // test + snapshot
        drop(snap);
        assert_eq!(Rc::strong_count(&a), 1);
    }

    #[test]
    fn clones_share_one_roster() {
        let notifier = Notifier::new();
        let twin = notifier.clone();
        let a = obs("a");
        attach(&a, &notifier);

        assert_eq!(names(&twin), vec!["a"]);
        assert!(notifier.ptr_eq(&twin));
        assert!(!notifier.ptr_eq(&Notifier::new()));
    }
}

// ── Attachment protocol ───────────────────────────────────────────────────────

#[cfg(test)]
mod attachment {
    use super::*;

    #[test]
    fn detach_removes_from_roster() {
        let notifier = Notifier::new();
        let (a, b) = (obs("a"), obs("b"));
        attach(&a, &notifier);
        attach(&b, &notifier);

        a.attachment.detach();
        assert_eq!(names(&notifier), vec!["b"]);
        assert!(!a.attachment.is_attached());
    }

    #[test]
    fn detach_is_idempotent() {
        let notifier = Notifier::new();
        let a = obs("a");
        attach(&a, &notifier);

        a.attachment.detach();
        a.attachment.detach();
        assert!(names(&notifier).is_empty());
    }

    #[test]
    fn reattach_to_same_notifier_keeps_position() {
        let notifier = Notifier::new();
        let (a, b) = (obs("a"), obs("b"));
        attach(&a, &notifier);
        attach(&b, &notifier);

        // No-op: "a" must not move to the end of the delivery order.
        attach(&a, &notifier);
        assert_eq!(names(&notifier), vec!["a", "b"]);
    }

    #[test]
    fn attach_elsewhere_implicitly_detaches() {
        let first = Notifier::new();
        let second = Notifier::new();
        let a = obs("a");

        attach(&a, &first);
        attach(&a, &second);

        assert!(names(&first).is_empty());
        assert_eq!(names(&second), vec!["a"]);
        assert!(a.attachment.notifier().unwrap().ptr_eq(&second));
    }

    #[test]
    fn dropping_observer_detaches() {
        let notifier = Notifier::new();
        let (a, b) = (obs("a"), obs("b"));
        attach(&a, &notifier);
        attach(&b, &notifier);

        drop(a);

        // The destroyed observer is gone; no broadcast will touch it.
        assert_eq!(names(&notifier), vec!["b"]);
        assert_eq!(notifier.len(), 1);
    }

    #[test]
    fn mid_broadcast_detach_does_not_disturb_snapshot() {
        let notifier = Notifier::new();
        let (a, b, c) = (obs("a"), obs("b"), obs("c"));
        attach(&a, &notifier);
        attach(&b, &notifier);
        attach(&c, &notifier);

        // Simulate a broadcast where delivering to "a" detaches "a": the
        // already-taken snapshot still visits b and c exactly once.
        let snap = notifier.snapshot();
        let mut delivered = Vec::new();
        for o in &snap {
            if o.name() == "a" {
                a.attachment.detach();
            }
            delivered.push(o.name());
        }

        assert_eq!(delivered, vec!["a", "b", "c"]);
        assert_eq!(names(&notifier), vec!["b", "c"]);
    }
}
