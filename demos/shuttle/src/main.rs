//! shuttle — smallest example for the rust_ak activity kernel.
//!
//! A single shuttle loops between four stops on logical time (1 unit =
//! 1 minute).  The shuttle's clock is one scheduled activity; a departure
//! board observes arrivals synchronously, while a maintenance log receives
//! the same notifications deferred through its own activity and therefore
//! sees them only when the manager runs it.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;

use ak_activity::{
    Activity, ActivityElement, ActivityManager, ActivityNotifiee, MainFn, Status, post,
    set_default_manager,
};
use ak_core::{Handle, Time};
use ak_notify::{Attachment, Notifier, NotifyError, NotifyResult};

// ── Constants ─────────────────────────────────────────────────────────────────

const LEG_MINUTES:   u64 = 15;  // one stop to the next
const SERVICE_TRIPS: u32 = 12;  // legs driven before the shuttle retires
const DAY_END:       Time = Time(24 * 60);

// ── Domain model ──────────────────────────────────────────────────────────────

/// What kind of stop this is — decided once at construction, never by
/// runtime type inspection.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum StopKind {
    Terminal,
    Street,
}

#[derive(Copy, Clone, Debug)]
struct Stop {
    name: &'static str,
    kind: StopKind,
}

const ROUTE: [Stop; 4] = [
    Stop { name: "depot",      kind: StopKind::Terminal },
    Stop { name: "market",     kind: StopKind::Street },
    Stop { name: "riverside",  kind: StopKind::Street },
    Stop { name: "north-gate", kind: StopKind::Terminal },
];

/// Observers of the shuttle.  One hook per notification kind, no-op
/// defaults, so implementors pick what they care about.
trait ShuttleNotifiee: ActivityElement {
    fn on_arrival(&self, _stop: Stop) -> NotifyResult {
        Ok(())
    }
}

/// The shuttle itself: a notifier announcing each arrival.
struct Shuttle {
    notifier: Notifier<dyn ShuttleNotifiee>,
    position: Cell<usize>,
}

impl Shuttle {
    fn new() -> Rc<Self> {
        Rc::new(Self { notifier: Notifier::new(), position: Cell::new(0) })
    }

    fn notifier(&self) -> &Notifier<dyn ShuttleNotifiee> {
        &self.notifier
    }

    /// Drive one leg and return the stop just reached.
    fn advance(&self) -> Stop {
        let next = (self.position.get() + 1) % ROUTE.len();
        self.position.set(next);
        ROUTE[next]
    }
}

// ── Observers ─────────────────────────────────────────────────────────────────

/// Synchronous observer: reacts the instant the shuttle arrives.
struct DepartureBoard {
    attachment: Attachment<dyn ShuttleNotifiee>,
    manager: Handle<ActivityManager>,
    arrivals: Cell<u32>,
}

impl ActivityElement for DepartureBoard {}

impl ShuttleNotifiee for DepartureBoard {
    fn on_arrival(&self, stop: Stop) -> NotifyResult {
        self.arrivals.set(self.arrivals.get() + 1);
        let now = self
            .manager
            .try_ref()
            .map_err(|e| NotifyError::reaction(e.to_string()))?
            .now();
        let marker = if stop.kind == StopKind::Terminal { "[T]" } else { "   " };
        println!("  {now:>6} {marker} arrived at {}", stop.name);
        Ok(())
    }
}

/// Deferred observer: arrivals queue up on the maintenance activity and are
/// only handled when the manager runs it.
struct MaintenanceLog {
    attachment: Attachment<dyn ShuttleNotifiee>,
    activity: Handle<Activity>,
    inspections: Cell<u32>,
}

impl ActivityElement for MaintenanceLog {
    fn activity(&self) -> Handle<Activity> {
        self.activity.clone()
    }
}

impl ShuttleNotifiee for MaintenanceLog {
    fn on_arrival(&self, stop: Stop) -> NotifyResult {
        // Runs inside the maintenance activity's drain, after the shuttle's
        // own run completed.
        if stop.kind == StopKind::Terminal {
            self.inspections.set(self.inspections.get() + 1);
            tracing::info!(stop = stop.name, "terminal inspection recorded");
        }
        Ok(())
    }
}

// ── Shuttle driver ────────────────────────────────────────────────────────────

/// Watches the clock activity: every time it runs, drive one leg, announce
/// it, and schedule the next departure.
struct ShuttleDriver {
    attachment: Attachment<dyn ActivityNotifiee>,
    activity: Handle<Activity>,
    shuttle: Rc<Shuttle>,
    legs_remaining: Cell<u32>,
}

impl ActivityElement for ShuttleDriver {}

impl ActivityNotifiee for ShuttleDriver {
    fn on_status(&self, status: Status) -> NotifyResult {
        if status != Status::Running {
            return Ok(());
        }
        let stop = self.shuttle.advance();
        post(self.shuttle.notifier(), move |n| n.on_arrival(stop));

        let left = self.legs_remaining.get();
        if left > 1 {
            self.legs_remaining.set(left - 1);
            self.activity
                .try_ref()
                .map_err(|e| NotifyError::reaction(e.to_string()))?
                .set_next_time_offset(LEG_MINUTES);
        }
        Ok(())
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== shuttle — rust_ak activity kernel ===");
    println!("Route: {} stops  |  Leg: {LEG_MINUTES} min  |  Legs: {SERVICE_TRIPS}", ROUTE.len());
    println!();

    // 1. One explicitly constructed manager, installed as the default.
    let manager = ActivityManager::new();
    set_default_manager(&manager);
    let m = manager.try_ref()?;
    m.set_verbose(true);

    // 2. The shuttle and its clock activity.
    let shuttle = Shuttle::new();
    let clock = m.create("shuttle-loop")?;

    // 3. Maintenance runs deferred on its own activity.
    let maintenance = m.create("maintenance")?;
    maintenance.try_ref()?.set_immediate_delivery(false);

    // 4. Observers.
    let board = Rc::new(DepartureBoard {
        attachment: Attachment::new(),
        manager: manager.clone(),
        arrivals: Cell::new(0),
    });
    let board_obs: Rc<dyn ShuttleNotifiee> = board.clone();
    board.attachment.attach(shuttle.notifier(), Rc::downgrade(&board_obs));

    let log = Rc::new(MaintenanceLog {
        attachment: Attachment::new(),
        activity: maintenance.clone(),
        inspections: Cell::new(0),
    });
    let log_obs: Rc<dyn ShuttleNotifiee> = log.clone();
    log.attachment.attach(shuttle.notifier(), Rc::downgrade(&log_obs));

    // 5. The driver reacts to each run of the clock activity.
    let driver = Rc::new(ShuttleDriver {
        attachment: Attachment::new(),
        activity: clock.clone(),
        shuttle: Rc::clone(&shuttle),
        legs_remaining: Cell::new(SERVICE_TRIPS),
    });
    let driver_obs: Rc<dyn ActivityNotifiee> = driver.clone();
    driver
        .attachment
        .attach(clock.try_ref()?.notifier(), Rc::downgrade(&driver_obs));

    // 6. Bootstrap: the main element schedules the first departure.
    let first = clock.clone();
    clock.try_ref()?.set_main(MainFn::new(Handle::null(), move || {
        first
            .try_ref()
            .map_err(|e| NotifyError::reaction(e.to_string()))?
            .set_next_time_offset(LEG_MINUTES);
        Ok(())
    }));

    // 7. Run the service day.
    m.advance_to(DAY_END);

    // 8. Summary, read through the installed default instance.
    let day = ak_activity::default_manager();
    println!();
    println!("Service day complete at {}", day.try_ref()?.now());
    println!("  arrivals announced : {}", board.arrivals.get());
    println!("  terminal inspections: {}", log.inspections.get());

    Ok(())
}
