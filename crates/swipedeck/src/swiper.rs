//! The deck itself.
//!
//! [`Swiper`] owns the deck items and wires the pieces together: the controls
//! write the active-index register, the bridge turns register changes into
//! host events, and after each index change the virtualization window is
//! reconciled on the host thread, mounting and unmounting cards through the
//! [`CardFactory`].

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use swipedeck_core::{HostQueue, PerfSpan, ReadOnlyProperty, ThreadAffinity};

use crate::bridge::EventBridge;
use crate::card::{CardFactory, CardKey, CardMount, CardPlacement, CardReporter, MountTicket};
use crate::config::SwiperConfig;
use crate::controls::{ControlState, SwipeControls};
use crate::events::SwiperEvents;
use crate::logging::targets;
use crate::registry::MountedCard;
use crate::window::{self, Slot, VirtualWindow};

/// Extracts an item's identity. Receives the item and its deck index.
pub type KeyFn<T> = dyn Fn(&T, usize) -> CardKey + Send + Sync;

/// Builder for [`Swiper`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use swipedeck::{CardHandle, CardMount, CardReporter, SpringConfig, Swiper, SwipeDirection, SwiperConfig};
/// use swipedeck_core::HostQueue;
///
/// struct Still;
///
/// impl CardHandle for Still {
///     fn swipe(&self, _: SwipeDirection, _: &SpringConfig) {}
///     fn swipe_back(&self, _: &SpringConfig, _: &SpringConfig) {}
///     fn flip(&self, _: std::time::Duration) {}
///     fn is_settled(&self) -> bool { true }
/// }
///
/// let host = HostQueue::new();
/// let swiper = Swiper::builder()
///     .config(SwiperConfig::builder(Default::default()).looping(true).build())
///     .key_fn(|name: &String, _| name.clone().into())
///     .build(
///         vec!["ada".to_string(), "grace".to_string()],
///         |_: &String, _: &CardMount, _: CardReporter| -> Arc<dyn CardHandle> { Arc::new(Still) },
///         &host,
///     );
///
/// assert_eq!(swiper.mounted_positions(), vec![0, 1]);
/// ```
pub struct SwiperBuilder<T> {
    config: SwiperConfig,
    key_fn: Option<Box<KeyFn<T>>>,
    window: VirtualWindow,
}

impl<T: Send + Sync + 'static> Default for SwiperBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> SwiperBuilder<T> {
    /// A builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: SwiperConfig::default(),
            key_fn: None,
            window: VirtualWindow::new(),
        }
    }

    /// Use `config`.
    pub fn config(mut self, config: SwiperConfig) -> Self {
        self.config = config;
        self
    }

    /// Identify items with `key_fn` instead of by position.
    pub fn key_fn<F>(mut self, key_fn: F) -> Self
    where
        F: Fn(&T, usize) -> CardKey + Send + Sync + 'static,
    {
        self.key_fn = Some(Box::new(key_fn));
        self
    }

    /// Override the look-ahead of the virtualization window.
    pub fn window_size(mut self, size: usize) -> Self {
        self.window = VirtualWindow::with_size(size);
        self
    }

    /// Build the deck on the host thread that drains `host`.
    pub fn build<F>(self, items: Vec<T>, factory: F, host: &HostQueue) -> Swiper<T>
    where
        F: CardFactory<T> + 'static,
    {
        let config = Arc::new(self.config);
        let events = Arc::new(SwiperEvents::new());
        let dispatcher = host.dispatcher();
        let len = items.len();

        let state = Arc::new(ControlState::new(
            config.clone(),
            len,
            dispatcher.clone(),
            events.clone(),
        ));
        let bridge = EventBridge::attach(
            state.register.clone(),
            len,
            config.looping,
            dispatcher,
            events.clone(),
        );

        let inner = Arc::new(SwiperInner {
            state,
            bridge,
            items: RwLock::new(items),
            factory: Box::new(factory),
            key_fn: self.key_fn,
            window: self.window,
            events,
            affinity: host.affinity(),
        });

        let weak = Arc::downgrade(&inner);
        inner.bridge.rendered().connect(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.reconcile();
            }
        });

        inner.reconcile();
        tracing::debug!(target: targets::WINDOW, len, looping = config.looping, "swiper created");

        Swiper { inner }
    }
}

struct SwiperInner<T> {
    state: Arc<ControlState>,
    bridge: EventBridge,
    items: RwLock<Vec<T>>,
    factory: Box<dyn CardFactory<T>>,
    key_fn: Option<Box<KeyFn<T>>>,
    window: VirtualWindow,
    events: Arc<SwiperEvents>,
    affinity: ThreadAffinity,
}

impl<T: Send + Sync + 'static> SwiperInner<T> {
    fn key_of(&self, item: &T, item_index: usize) -> CardKey {
        match &self.key_fn {
            Some(key_fn) => key_fn(item, item_index),
            None => CardKey::Index(item_index),
        }
    }

    /// Bring the mounted set in line with the current active index.
    fn reconcile(&self) {
        self.affinity.debug_assert_same_thread("Swiper::reconcile");
        let _span = PerfSpan::new("reconcile_window");

        let state = &self.state;
        let active = state.register.get();
        let len = state.deck_len();
        let looping = state.config.looping;
        let gone = state.gone.lock().clone();

        let mut desired: Vec<Slot> = Vec::new();
        desired.extend(
            self.window
                .retained(active, len, looping)
                .filter(|slot| gone.contains_key(&slot.position)),
        );
        desired.extend(self.window.slots(active, len, looping));

        let items = self.items.read();
        let keyed: Vec<(Slot, CardKey)> = desired
            .into_iter()
            .filter_map(|slot| {
                let item = items.get(slot.item_index)?;
                Some((slot, self.key_of(item, slot.item_index)))
            })
            .collect();

        let (to_mount, to_unmount) = {
            let registry = state.registry.read();
            let to_mount: Vec<(Slot, CardKey)> = keyed
                .iter()
                .filter(|(slot, key)| registry.key(slot.position) != Some(key))
                .cloned()
                .collect();
            let to_unmount: Vec<usize> = registry
                .positions()
                .into_iter()
                .filter(|position| !keyed.iter().any(|(slot, _)| slot.position == *position))
                .collect();
            (to_mount, to_unmount)
        };

        if to_mount.is_empty() && to_unmount.is_empty() {
            return;
        }

        let prerender_items = state.config.prerender_items_for(len);
        let mut mounted = Vec::with_capacity(to_mount.len());
        for (slot, key) in to_mount {
            let ticket = MountTicket::next();
            let placement = gone
                .get(&slot.position)
                .map_or(CardPlacement::Resting, |&direction| CardPlacement::OffScreen(direction));
            let mount = CardMount {
                position: slot.position,
                item_index: slot.item_index,
                key: key.clone(),
                placement,
                prerender_items,
                config: state.config.clone(),
            };
            let reporter = CardReporter::new(slot.position, ticket, Arc::downgrade(state));
            let handle = self.factory.mount(&items[slot.item_index], &mount, reporter);
            mounted.push((slot.position, MountedCard { key, ticket, handle }));
        }
        drop(items);

        for position in to_unmount.iter().chain(mounted.iter().map(|(position, _)| position)) {
            state.cancel_transition_at(*position);
        }

        let mut replaced = Vec::new();
        {
            let mut registry = state.registry.write();
            for position in &to_unmount {
                registry.remove(*position);
            }
            for (position, card) in mounted {
                if registry.insert(position, card).is_some() {
                    replaced.push(position);
                }
            }
        }

        for position in to_unmount.iter().chain(replaced.iter()) {
            self.factory.unmount(*position);
        }

        tracing::debug!(
            target: targets::WINDOW,
            active,
            len,
            unmounted = to_unmount.len(),
            remounted = replaced.len(),
            "window reconciled"
        );
    }
}

/// A swipeable card deck.
pub struct Swiper<T> {
    inner: Arc<SwiperInner<T>>,
}

impl<T: Send + Sync + 'static> Swiper<T> {
    /// Start building a deck.
    pub fn builder() -> SwiperBuilder<T> {
        SwiperBuilder::new()
    }

    /// A deck with the default configuration and positional keys.
    pub fn new<F>(items: Vec<T>, factory: F, host: &HostQueue) -> Self
    where
        F: CardFactory<T> + 'static,
    {
        Self::builder().build(items, factory, host)
    }

    /// The host-facing signals.
    pub fn events(&self) -> &SwiperEvents {
        &self.inner.events
    }

    /// The imperative operations, usable from any thread.
    pub fn controls(&self) -> SwipeControls {
        SwipeControls::new(self.inner.state.clone())
    }

    /// The host's handle: imperative operations plus the snapshot index.
    pub fn handle(&self) -> SwiperHandle {
        SwiperHandle {
            controls: self.controls(),
            active_index: self.inner.bridge.snapshot(),
        }
    }

    /// The host-visible active index.
    ///
    /// Moves only when the host queue delivers the matching `index_changed`.
    pub fn active_index(&self) -> usize {
        self.inner.bridge.snapshot().get()
    }

    /// The deck configuration.
    pub fn config(&self) -> &SwiperConfig {
        &self.inner.state.config
    }

    /// Number of items in the deck.
    pub fn len(&self) -> usize {
        self.inner.state.deck_len()
    }

    /// Whether the deck has no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a non-looping deck has run out of cards.
    pub fn is_exhausted(&self) -> bool {
        self.inner.bridge.is_exhausted()
    }

    /// Mounted positions, ascending.
    pub fn mounted_positions(&self) -> Vec<usize> {
        self.inner.state.registry.read().positions()
    }

    /// Mounted positions in paint order: the next card to act comes last.
    pub fn paint_order(&self) -> Vec<usize> {
        window::paint_order(self.mounted_positions())
    }

    /// Run `f` with the deck items.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.inner.items.read())
    }

    /// Replace the deck.
    ///
    /// The active index is clamped to the new length, cards whose key at the
    /// same position changed are remounted, and exhaustion is re-evaluated.
    /// Must be called on the host thread.
    pub fn set_data(&self, items: Vec<T>) {
        let inner = &self.inner;
        inner.affinity.debug_assert_same_thread("Swiper::set_data");

        let len = items.len();
        *inner.items.write() = items;
        inner.state.deck_len.store(len, std::sync::atomic::Ordering::SeqCst);

        inner.bridge.resize(len);

        let active = inner.state.register.get();
        inner.state.gone.lock().retain(|position, _| *position < active);

        tracing::debug!(target: targets::WINDOW, len, active, "deck replaced");
        inner.reconcile();
    }
}

impl<T> fmt::Debug for Swiper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Swiper")
            .field("bridge", &self.inner.bridge)
            .field("registry", &*self.inner.state.registry.read())
            .finish_non_exhaustive()
    }
}

/// What the host holds on to: the imperative operations and a snapshot of
/// the active index.
///
/// The snapshot is the host-visible value, updated on the host thread after
/// `index_changed` is delivered. It can lag the live register while events are
/// queued.
#[derive(Clone)]
pub struct SwiperHandle {
    controls: SwipeControls,
    active_index: ReadOnlyProperty<usize>,
}

impl SwiperHandle {
    /// Swipe the active card to the left.
    pub fn swipe_left(&self) -> bool {
        self.controls.swipe_left()
    }

    /// Swipe the active card to the right.
    pub fn swipe_right(&self) -> bool {
        self.controls.swipe_right()
    }

    /// Swipe the active card to the top.
    pub fn swipe_top(&self) -> bool {
        self.controls.swipe_top()
    }

    /// Swipe the active card to the bottom.
    pub fn swipe_bottom(&self) -> bool {
        self.controls.swipe_bottom()
    }

    /// Bring the previously swiped card back.
    pub fn swipe_back(&self) -> bool {
        self.controls.swipe_back()
    }

    /// Flip the active card.
    pub fn flip_card(&self) -> bool {
        self.controls.flip_card()
    }

    /// The host-visible active index.
    pub fn active_index(&self) -> usize {
        self.active_index.get()
    }
}

impl fmt::Debug for SwiperHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwiperHandle")
            .field("active_index", &self.active_index.get())
            .finish()
    }
}

static_assertions::assert_impl_all!(SwiperHandle: Send, Sync, Clone);
static_assertions::assert_impl_all!(Swiper<String>: Send, Sync);
