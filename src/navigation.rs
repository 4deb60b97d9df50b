//! Top-level navigation between the splash, the deal listing and a deal's detail.
//!
//! The navigator is driven entirely from the outside: the event loop feeds it touch events,
//! user actions and provider responses, advances its animations once per frame and reads back a
//! [`Frame`] with the offsets to render. It never talks to the provider itself; instead it queues
//! [`Fetch`] requests that the event loop executes and answers through the `on_*` methods.

use std::mem;
use std::rc::Rc;
use std::time::Duration;

use bakesale_config::Config;

use crate::animation::Clock;
use crate::carousel::{Carousel, CarouselEvent};
use crate::deal::{Deal, DealId};
use crate::debounce::Debouncer;
use crate::gesture::{Activation, SwipeDecision};
use crate::oscillation::Oscillation;

#[cfg(test)]
mod tests;

/// Request for the deals provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    InitialDeals,
    Search(String),
    Detail(DealId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No data yet.
    Splash,
    /// Deals shown, none selected.
    Listing,
    /// One deal open.
    Detail,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub mode: Mode,
    /// Horizontal offset of the open deal.
    pub deal_offset: f64,
    /// Horizontal offset of the shown image of the open deal.
    pub image_offset: f64,
    /// Horizontal offset of the splash title, while the splash is up.
    pub title_offset: Option<f64>,
    pub deal_idx: Option<usize>,
    pub image_idx: Option<usize>,
}

#[derive(Debug)]
enum Screen {
    Splash { title: Oscillation },
    Listing,
    Detail(DetailView),
}

#[derive(Debug)]
struct DetailView {
    deal: Deal,
    images: Carousel<String>,
}

/// Carousel a touch sequence is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TouchTarget {
    /// Not claimed by any carousel yet.
    Undecided,
    Deals,
    Images,
    /// Nothing in the current mode reacts to this touch.
    Ignored,
}

#[derive(Debug)]
struct Touch {
    y: f64,
    target: TouchTarget,
}

#[derive(Debug)]
pub struct Navigator {
    clock: Clock,
    options: Rc<Config>,
    viewport_width: f64,
    screen: Screen,
    /// Result of the initial fetch, shown whenever a search comes up empty.
    all_deals: Vec<Deal>,
    /// The listing, which is also the outer carousel of the detail view.
    deals: Carousel<Deal>,
    search: Debouncer<String>,
    /// Last term that came out of the debouncer.
    search_term: String,
    /// Listing replacement that arrived while a deal was open.
    stashed_deals: Option<Vec<Deal>>,
    fetches: Vec<Fetch>,
    touch: Option<Touch>,
}

impl Navigator {
    pub fn new(clock: Clock, viewport_width: f64, options: Rc<Config>) -> Self {
        let deals = Carousel::new(
            Vec::new(),
            Activation::HorizontalBelow {
                min_y: options.gestures.deal_swipe_min_y.0,
                dominance: options.gestures.horizontal_dominance.0,
            },
            viewport_width,
            clock.clone(),
            options.clone(),
        );
        let search = Debouncer::new(Duration::from_millis(u64::from(options.search.debounce_ms)));

        let mut navigator = Self {
            screen: Screen::Listing,
            clock,
            options,
            viewport_width,
            all_deals: Vec::new(),
            deals,
            search,
            search_term: String::new(),
            stashed_deals: None,
            fetches: vec![Fetch::InitialDeals],
            touch: None,
        };
        navigator.show_splash();
        navigator
    }

    pub fn mode(&self) -> Mode {
        match self.screen {
            Screen::Splash { .. } => Mode::Splash,
            Screen::Listing => Mode::Listing,
            Screen::Detail(_) => Mode::Detail,
        }
    }

    /// Deals currently backing the listing.
    pub fn deals(&self) -> &[Deal] {
        self.deals.items()
    }

    /// The open deal.
    pub fn detail(&self) -> Option<&Deal> {
        match &self.screen {
            Screen::Detail(view) => Some(&view.deal),
            _ => None,
        }
    }

    pub fn image_urls(&self) -> Option<&[String]> {
        match &self.screen {
            Screen::Detail(view) => Some(view.images.items()),
            _ => None,
        }
    }

    pub fn is_title_oscillating(&self) -> bool {
        match &self.screen {
            Screen::Splash { title } => title.is_running(),
            _ => false,
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Whether a typed search term is still waiting for its quiet period.
    pub fn is_search_pending(&self) -> bool {
        self.search.deadline().is_some()
    }

    /// Takes the provider requests queued since the last call.
    pub fn take_fetches(&mut self) -> Vec<Fetch> {
        mem::take(&mut self.fetches)
    }

    pub fn on_initial_deals(&mut self, result: anyhow::Result<Vec<Deal>>) {
        let deals = match result {
            Ok(deals) => deals,
            Err(err) => {
                warn!("error fetching initial deals: {err:?}");
                return;
            }
        };

        debug!("received {} initial deals", deals.len());
        self.all_deals = deals.clone();
        self.replace_listing(deals);
    }

    pub fn on_search_results(&mut self, term: &str, result: anyhow::Result<Vec<Deal>>) {
        if term != self.search_term {
            debug!("ignoring results for outdated search term {term:?}");
            return;
        }

        let deals = match result {
            Ok(deals) => deals,
            Err(err) => {
                warn!("error searching deals for {term:?}: {err:?}");
                return;
            }
        };

        debug!("received {} deals for {term:?}", deals.len());
        self.replace_listing(deals);
    }

    pub fn on_detail_fetched(&mut self, result: anyhow::Result<Deal>) {
        let deal = match result {
            Ok(deal) => deal,
            Err(err) => {
                warn!("error fetching deal detail: {err:?}");
                return;
            }
        };

        let media_changed = match &self.screen {
            Screen::Detail(view) if view.deal.key == deal.key => view.deal.media != deal.media,
            Screen::Detail(view) => {
                debug!(
                    "ignoring detail of {} while {} is open",
                    deal.key, view.deal.key
                );
                return;
            }
            _ => {
                debug!("ignoring detail of {} outside of the detail view", deal.key);
                return;
            }
        };

        let images = media_changed.then(|| self.new_images(&deal));
        let Screen::Detail(view) = &mut self.screen else {
            return;
        };
        if let Some(images) = images {
            view.images.teardown();
            view.images = images;
        }
        view.deal = deal;
    }

    /// Feeds one keystroke-level change of the search box.
    pub fn search_input(&mut self, text: &str) {
        let now = self.clock.now_unadjusted();
        self.search.push(text.to_owned(), now);
    }

    /// Opens the deal with `key` from the listing.
    pub fn select(&mut self, key: &DealId) -> bool {
        if !matches!(self.screen, Screen::Listing) {
            debug!("ignoring select of {key} outside of the listing");
            return false;
        }
        if !self.deals.select_by_key(key) {
            return false;
        }

        let Some(deal) = self.deals.current().cloned() else {
            return false;
        };
        debug!("opening deal {}", deal.key);
        self.open(deal);
        true
    }

    /// Closes the open deal.
    pub fn back(&mut self) -> bool {
        let Screen::Detail(view) = &mut self.screen else {
            return false;
        };

        debug!("closing deal {}", view.deal.key);
        view.images.teardown();
        self.touch = None;
        self.deals.clear_selection();
        self.screen = Screen::Listing;

        if let Some(deals) = self.stashed_deals.take() {
            self.replace_listing(deals);
        }
        true
    }

    pub fn touch_down(&mut self, y: f64) {
        self.touch_cancel();

        let mut target = match self.screen {
            Screen::Detail(_) => TouchTarget::Undecided,
            _ => TouchTarget::Ignored,
        };

        // The image area takes every touch that starts in it right away.
        if let Screen::Detail(view) = &mut self.screen {
            if y < self.options.gestures.deal_swipe_min_y.0
                && view.images.should_activate(y, 0., 0.)
                && view.images.gesture_begin()
            {
                target = TouchTarget::Images;
            }
        }

        trace!("touch down at y={y} routed to {target:?}");
        self.touch = Some(Touch { y, target });
    }

    /// Applies a movement of `(dx, dy)` relative to where the touch went down.
    pub fn touch_move(&mut self, dx: f64, dy: f64, timestamp: Duration) {
        let Some(touch) = &mut self.touch else {
            return;
        };
        let Screen::Detail(view) = &mut self.screen else {
            return;
        };

        if touch.target == TouchTarget::Undecided
            && touch.y >= self.options.gestures.deal_swipe_min_y.0
            && self.deals.should_activate(touch.y, dx, dy)
            && self.deals.gesture_begin()
        {
            trace!("deals carousel claimed touch");
            touch.target = TouchTarget::Deals;
        }

        match touch.target {
            TouchTarget::Deals => {
                self.deals.gesture_update(dx, dy, timestamp);
            }
            TouchTarget::Images => {
                view.images.gesture_update(dx, dy, timestamp);
            }
            TouchTarget::Undecided | TouchTarget::Ignored => (),
        }
    }

    /// Ends the touch with the release displacement `dx`.
    pub fn touch_up(&mut self, dx: f64, timestamp: Duration) -> Option<SwipeDecision> {
        let touch = self.touch.take()?;

        match (touch.target, &mut self.screen) {
            (TouchTarget::Deals, _) => self.deals.gesture_end(dx, timestamp),
            (TouchTarget::Images, Screen::Detail(view)) => view.images.gesture_end(dx, timestamp),
            _ => None,
        }
    }

    /// Drops the touch, returning anything it dragged to rest.
    pub fn touch_cancel(&mut self) {
        let Some(touch) = self.touch.take() else {
            return;
        };

        match (touch.target, &mut self.screen) {
            (TouchTarget::Deals, _) => self.deals.gesture_cancel(),
            (TouchTarget::Images, Screen::Detail(view)) => view.images.gesture_cancel(),
            _ => (),
        }
    }

    pub fn advance_animations(&mut self) {
        let _span = tracy_client::span!("Navigator::advance_animations");

        if let Some(term) = self.search.poll(self.clock.now_unadjusted()) {
            self.dispatch_search(term);
        }

        if let Some(CarouselEvent::Advanced { idx, direction }) = self.deals.advance_animations() {
            debug!("swiped {direction:?} to deal {idx}");
            let deal = self.deals.current().cloned();
            if let Some(deal) = deal.filter(|_| matches!(self.screen, Screen::Detail(_))) {
                self.open(deal);
            }
        }

        match &mut self.screen {
            Screen::Splash { title } => title.advance_animations(),
            Screen::Listing => (),
            Screen::Detail(view) => {
                if let Some(CarouselEvent::Advanced { idx, .. }) = view.images.advance_animations()
                {
                    trace!("showing image {idx} of {}", view.deal.key);
                }
            }
        }
    }

    pub fn are_animations_ongoing(&self) -> bool {
        let screen = match &self.screen {
            Screen::Splash { title } => title.is_running(),
            Screen::Listing => false,
            Screen::Detail(view) => view.images.are_animations_ongoing(),
        };
        screen || self.deals.are_animations_ongoing()
    }

    pub fn frame(&self) -> Frame {
        let mut frame = Frame {
            mode: self.mode(),
            deal_offset: 0.,
            image_offset: 0.,
            title_offset: None,
            deal_idx: None,
            image_idx: None,
        };

        match &self.screen {
            Screen::Splash { title } => frame.title_offset = Some(title.offset()),
            Screen::Listing => (),
            Screen::Detail(view) => {
                frame.deal_offset = self.deals.offset();
                frame.deal_idx = self.deals.current_idx();
                frame.image_offset = view.images.offset();
                frame.image_idx = view.images.current_idx();
            }
        }

        frame
    }

    fn dispatch_search(&mut self, term: String) {
        debug!("searching for {term:?}");
        self.search_term = term.clone();

        if term.is_empty() {
            self.replace_listing(self.all_deals.clone());
        } else {
            self.fetches.push(Fetch::Search(term));
        }
    }

    /// Puts `deals` behind the listing, falling back to the unfiltered list when empty.
    fn replace_listing(&mut self, deals: Vec<Deal>) {
        let deals = if deals.is_empty() {
            self.all_deals.clone()
        } else {
            deals
        };

        if matches!(self.screen, Screen::Detail(_)) {
            debug!("stashing {} deals until the open deal is closed", deals.len());
            self.stashed_deals = Some(deals);
            return;
        }

        if deals.is_empty() {
            self.deals.reset(deals);
            self.show_splash();
            return;
        }

        self.deals.reset(deals);
        if matches!(self.screen, Screen::Splash { .. }) {
            debug!("leaving the splash");
        }
        // Dropping the splash tears its title oscillation down.
        if let Screen::Splash { mut title } = mem::replace(&mut self.screen, Screen::Listing) {
            title.stop();
        }
    }

    fn show_splash(&mut self) {
        if matches!(self.screen, Screen::Splash { .. }) {
            return;
        }

        let mut title = Oscillation::new(
            self.clock.clone(),
            self.viewport_width,
            self.options.clone(),
        );
        title.start();
        self.screen = Screen::Splash { title };
    }

    fn open(&mut self, deal: Deal) {
        if let Screen::Detail(view) = &mut self.screen {
            view.images.teardown();
        }

        self.fetches.push(Fetch::Detail(deal.key.clone()));
        let images = self.new_images(&deal);
        self.screen = Screen::Detail(DetailView { deal, images });
    }

    fn new_images(&self, deal: &Deal) -> Carousel<String> {
        let mut images = Carousel::new(
            deal.media.clone(),
            Activation::Always,
            self.viewport_width,
            self.clock.clone(),
            self.options.clone(),
        );
        images.select_index(0);
        images
    }
}
