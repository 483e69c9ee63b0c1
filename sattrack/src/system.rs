use serde::Serialize;
use tokio::sync::{watch, Notify};
use tletypes::prelude::*;
use tracing::{debug, info};

use crate::{
    frames,
    propagator::{propagate, PropagationError},
    ranking::{filter_and_rank, PopularCatalog},
    report::SatelliteReport,
    source::{ElementSource, RetrievalError},
    store::{ElementSnapshot, ElementStore, OrbitalElementSet},
    units::Timestamp,
    PeriodicComponent,
};

/// What consumers observe after every fast cycle
#[derive(Clone, PartialEq, Debug, Default, Serialize)]
pub struct TrackerState {
    /// Ranked, highest elevation first
    pub reports: Vec<SatelliteReport>,

    /// Element sets and an observer location were both available
    pub ready: bool,
}

impl TrackerState {
    pub fn not_ready() -> Self {
        Self::default()
    }
}

/// The whole tracker: the element store, the popular catalog and the
/// published state.
pub struct Tracker {
    store: ElementStore,
    popular: PopularCatalog,
    state_tx: watch::Sender<TrackerState>,
    refreshed: Notify,
}

impl Tracker {
    pub fn new(popular: PopularCatalog) -> Self {
        let (state_tx, _) = watch::channel(TrackerState::not_ready());
        Self {
            store: ElementStore::new(),
            popular,
            state_tx,
            refreshed: Notify::new(),
        }
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn popular(&self) -> &PopularCatalog {
        &self.popular
    }

    pub fn subscribe(&self) -> watch::Receiver<TrackerState> {
        self.state_tx.subscribe()
    }

    /// The most recently published state
    pub fn state(&self) -> TrackerState {
        self.state_tx.borrow().clone()
    }

    /// Slow cycle body. On failure the store keeps its last-known-good
    /// catalog.
    pub async fn refresh<S: ElementSource>(&self, source: &S, now: Timestamp) -> Result<usize, RetrievalError> {
        let raw = source.fetch_element_sets().await?;
        let snapshot = ElementSnapshot::from_raw(raw, now);
        let count = snapshot.len();
        if snapshot.dropped() > 0 {
            info!(dropped = snapshot.dropped(), "Dropped catalog entries without element lines");
        }
        self.store.replace(snapshot);
        self.refreshed.notify_one();
        Ok(count)
    }

    /// Resolves once per successful refresh
    pub async fn refreshed(&self) {
        self.refreshed.notified().await
    }

    /// Fast cycle body, without publishing
    pub fn compute(&self, now: Timestamp, observer: Option<&ObserverLocation>) -> TrackerState {
        let Some(observer) = observer.filter(|o| o.is_valid()) else {
            debug!(?observer, "Observer location unknown, skipping tick");
            return TrackerState::not_ready();
        };

        let snapshot = self.store.get();
        if snapshot.is_empty() {
            debug!("No element sets yet, skipping tick");
            return TrackerState::not_ready();
        }

        let reports = compute_reports(&snapshot, observer, &self.popular, now);
        TrackerState {
            reports: filter_and_rank(reports),
            ready: true,
        }
    }

    pub fn publish(&self, state: TrackerState) {
        self.state_tx.send_replace(state);
    }
}

impl PeriodicComponent for Tracker {
    type Environment = Option<ObserverLocation>;
    type Output = TrackerState;

    /// Computes and publishes, returning what was published
    fn tick(&self, now: Timestamp, observer: &Self::Environment) -> TrackerState {
        let state = self.compute(now, observer.as_ref());
        self.publish(state.clone());
        state
    }
}

/// Reports for every element set in the snapshot. Element sets that fail
/// to propagate are skipped.
pub fn compute_reports(
    snapshot: &ElementSnapshot,
    observer: &ObserverLocation,
    popular: &PopularCatalog,
    now: Timestamp,
) -> Vec<SatelliteReport> {
    snapshot
        .iter()
        .filter_map(|set| match report_for(set, observer, popular, now) {
            Ok(report) => Some(report),
            Err(e) => {
                debug!(name = %set.name, error = %e, "Skipping satellite");
                None
            }
        })
        .collect()
}

pub fn report_for(
    set: &OrbitalElementSet,
    observer: &ObserverLocation,
    popular: &PopularCatalog,
    now: Timestamp,
) -> Result<SatelliteReport, PropagationError> {
    let state = propagate(set, now)?;
    let geodetic = frames::to_geodetic(&state, now);
    let look = frames::to_look_angles(observer, &state, now);
    Ok(SatelliteReport::new(
        &set.name,
        &geodetic,
        &look,
        popular.is_popular(&set.name),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Time;

    const ISS_L1: &str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_L2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    fn epoch() -> Timestamp {
        "2008-09-20T12:25:40Z".parse().unwrap()
    }

    fn tracker_with(sets: Vec<OrbitalElementSet>) -> Tracker {
        let tracker = Tracker::new(PopularCatalog::default());
        tracker.store().replace(ElementSnapshot::new(sets));
        tracker
    }

    fn iss() -> OrbitalElementSet {
        OrbitalElementSet::new("ISS (ZARYA)", ElementLines::new(ISS_L1, ISS_L2))
    }

    /// SO-50 with a mean motion of 100 revolutions per day
    fn decayed_so50() -> OrbitalElementSet {
        OrbitalElementSet::new(
            "SO-50",
            ElementLines::new(
                "1 27607U 02058C   20194.51234567  .00000312  00000-0  53401-4 0  9999",
                "2 27607  64.5561 198.2231 0046972 251.3432 108.2551 99.99999999939211",
            ),
        )
    }

    #[test]
    fn failed_propagation_is_isolated() {
        let observer = ObserverLocation::new(51.5, -0.12);

        // Broken entries sort both before and after the good one
        for name in ["BROKEN", "ZZZ BROKEN"] {
            let broken = OrbitalElementSet::new(name, ElementLines::new("1 garbage", "2 garbage"));
            let tracker = tracker_with(vec![iss(), broken]);
            assert_eq!(tracker.store().get().len(), 2);

            let state = tracker.compute(epoch(), Some(&observer));
            assert!(state.ready, "{name}");
            assert_eq!(state.reports.len(), 1, "{name}");
            assert_eq!(state.reports[0].name, "ISS (ZARYA)");
            assert!(state.reports[0].popular);
        }
    }

    #[test]
    fn decayed_satellite_is_not_reported() {
        let observer = ObserverLocation::new(51.5, -0.12);
        let so50_epoch: Timestamp = "2020-07-12T12:30:00Z".parse().unwrap();

        let tracker = tracker_with(vec![decayed_so50()]);
        let state = tracker.compute(so50_epoch, Some(&observer));
        assert!(state.ready);
        assert!(state.reports.is_empty());
        assert!(matches!(
            report_for(&decayed_so50(), &observer, &PopularCatalog::default(), so50_epoch),
            Err(PropagationError::Decayed(_))
        ));

        let tracker = tracker_with(vec![decayed_so50(), iss()]);
        let state = tracker.compute(epoch(), Some(&observer));
        let names: Vec<_> = state.reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["ISS (ZARYA)"]);
    }

    #[test]
    fn not_ready_without_observer() {
        let tracker = tracker_with(vec![iss()]);
        assert_eq!(tracker.compute(epoch(), None), TrackerState::not_ready());

        let invalid = ObserverLocation::new(120.0, 0.0);
        assert!(!tracker.compute(epoch(), Some(&invalid)).ready);
    }

    #[test]
    fn not_ready_without_elements() {
        let tracker = Tracker::new(PopularCatalog::default());
        let observer = ObserverLocation::new(0.0, 0.0);
        assert!(!tracker.compute(epoch(), Some(&observer)).ready);
    }

    #[test]
    fn ready_with_nothing_relevant() {
        let tracker = Tracker::new(PopularCatalog::new(["NOTHING"]));
        tracker.store().replace(ElementSnapshot::new(vec![iss()]));

        // Over a day, the ISS spends most of its time well below any horizon
        let observer = ObserverLocation::new(0.0, 0.0);
        let hidden = (0..1440)
            .map(|m| epoch() + Time::from_minutes(f64::from(m)))
            .map(|t| tracker.compute(t, Some(&observer)))
            .find(|s| s.reports.is_empty())
            .unwrap();
        assert!(hidden.ready);
    }

    #[test]
    fn tick_publishes() {
        let tracker = tracker_with(vec![iss()]);
        let mut rx = tracker.subscribe();
        let observer = Some(ObserverLocation::new(51.5, -0.12));

        let state = tracker.tick(epoch(), &observer);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), state);
        assert_eq!(tracker.state(), state);
    }

    #[test]
    fn report_fields_are_consistent() {
        let observer = ObserverLocation::new(51.5, -0.12);
        let report = report_for(&iss(), &observer, &PopularCatalog::default(), epoch()).unwrap();
        assert!((-90.0..=90.0).contains(&report.latitude));
        assert!((-180.0..=180.0).contains(&report.longitude));
        assert!(report.altitude > 300 && report.altitude < 450);
        assert!((0..=360).contains(&report.azimuth));
        assert_eq!(report.visible, report.raw_elevation() > 0.0);
    }
}
