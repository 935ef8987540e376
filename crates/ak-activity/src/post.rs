//! The broadcast dispatcher.

use std::rc::Rc;

use ak_notify::{Notifier, NotifyResult};

use crate::element::ActivityElement;

/// Deliver a notification to every observer attached to `notifier`.
///
/// `selector` picks the hook to invoke; for a notification carrying an
/// argument, capture it in the closure:
///
/// ```rust,ignore
/// post(shuttle.notifier(), move |n| n.on_stop(stop));
/// ```
///
/// Iteration runs over a snapshot of the roster, so an observer that
/// attaches or detaches from inside its reaction cannot disturb delivery to
/// the others.  Per observer, the delivery mode is chosen by its bound
/// activity:
///
/// - no bound activity, or the activity has immediate delivery: the hook
///   runs synchronously, now.  An `Err` is logged, redirected to that
///   observer's `on_notification_error` hook, and delivery to the remaining
///   observers proceeds unaffected.
/// - bound activity with deferred delivery: a posting is appended to that
///   activity's queue.  The posting owns a strong handle to the observer,
///   so the observer cannot be destroyed while queued; a failing reaction
///   reports to the observer's hook before the drain logs it.
pub fn post<N>(notifier: &Notifier<N>, selector: impl Fn(&N) -> NotifyResult + 'static)
where
    N: ActivityElement + ?Sized + 'static,
{
    let selector = Rc::new(selector);
    for observer in notifier.snapshot() {
        let route = observer.activity();
        let deferred = match route.as_rc() {
            Some(activity) if !activity.immediate_delivery() => Some(Rc::clone(activity)),
            _ => None,
        };

        match deferred {
            Some(activity) => {
                let selector = Rc::clone(&selector);
                let reactor = Rc::clone(&observer);
                activity.posting_new(Box::new(move || {
                    selector(&reactor).inspect_err(|error| {
                        reactor.on_notification_error(error);
                    })
                }));
            }
            None => {
                if let Err(error) = selector(&observer) {
                    tracing::error!(error = %error, "notification delivery failed");
                    observer.on_notification_error(&error);
                }
            }
        }
    }
}
