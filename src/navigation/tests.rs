use std::fmt::Write as _;

use anyhow::anyhow;
use approx::assert_abs_diff_eq;
use insta::assert_snapshot;

use super::*;
use crate::deal::Cause;
use crate::gesture::Direction;

const WIDTH: f64 = 400.;
/// Touch y inside the image area.
const IMAGE_Y: f64 = 100.;
/// Touch y below the image area, where deal swipes start.
const DEAL_Y: f64 = 300.;

fn deal(key: &str, title: &str, media: usize) -> Deal {
    Deal {
        key: DealId::from(key),
        title: title.to_owned(),
        price: 1250,
        cause: Cause {
            name: String::from("Shelter"),
        },
        media: (0..media).map(|i| format!("https://img/{key}/{i}.jpg")).collect(),
        description: None,
        user: None,
        buy_url: None,
    }
}

fn three_deals() -> Vec<Deal> {
    vec![
        deal("a", "Mug", 1),
        deal("b", "Scarf", 2),
        deal("c", "Tea Set", 3),
    ]
}

fn format_frame(frame: &Frame) -> String {
    fn idx(idx: Option<usize>) -> String {
        idx.map_or_else(|| String::from("-"), |idx| idx.to_string())
    }

    let mut buf = format!("{:?}", frame.mode);
    write!(
        buf,
        " deal:{} at x:{:.0} image:{} at x:{:.0}",
        idx(frame.deal_idx),
        frame.deal_offset,
        idx(frame.image_idx),
        frame.image_offset,
    )
    .unwrap();
    buf
}

struct Fixture {
    clock: Clock,
    nav: Navigator,
    time: Duration,
}

impl Fixture {
    fn new() -> Self {
        let clock = Clock::with_time(Duration::ZERO);
        let nav = Navigator::new(clock.clone(), WIDTH, Rc::new(Config::default()));
        Self {
            clock,
            nav,
            time: Duration::ZERO,
        }
    }

    fn listing() -> Self {
        let mut f = Self::new();
        assert_eq!(f.nav.take_fetches(), [Fetch::InitialDeals]);
        f.nav.on_initial_deals(Ok(three_deals()));
        f
    }

    /// Listing with the two-image deal open.
    fn detail() -> Self {
        let mut f = Self::listing();
        assert!(f.nav.select(&DealId::from("b")));
        f.nav.take_fetches();
        f
    }

    fn tick(&mut self, ms: u64) {
        self.time += Duration::from_millis(ms);
        self.clock.set_unadjusted(self.time);
        self.nav.advance_animations();
    }

    fn settle(&mut self) {
        for _ in 0..200 {
            self.tick(16);
            if !self.nav.are_animations_ongoing() {
                break;
            }
        }
    }

    fn swipe(&mut self, y: f64, dx: f64) -> Option<SwipeDecision> {
        self.nav.touch_down(y);
        self.nav.touch_move(dx / 2., 0., self.time);
        self.tick(16);
        self.nav.touch_move(dx, 0., self.time);
        self.nav.touch_up(dx, self.time)
    }

    fn frame(&self) -> String {
        format_frame(&self.nav.frame())
    }
}

#[test]
fn empty_initial_deals_stay_on_splash() {
    let mut f = Fixture::new();
    assert_eq!(f.nav.take_fetches(), [Fetch::InitialDeals]);

    f.nav.on_initial_deals(Ok(vec![]));
    assert_eq!(f.nav.mode(), Mode::Splash);
    assert!(f.nav.is_title_oscillating());

    // The title keeps swinging between the extremes at ±(400 - 150) / 2.
    f.tick(1000);
    assert_eq!(f.nav.frame().title_offset, Some(125.));
    f.tick(1000);
    assert_eq!(f.nav.frame().title_offset, Some(-125.));
    f.tick(500);
    assert!(f.nav.is_title_oscillating());
}

#[test]
fn initial_deals_show_listing() {
    let mut f = Fixture::new();
    f.tick(300);

    f.nav.on_initial_deals(Ok(three_deals()));
    assert_eq!(f.nav.mode(), Mode::Listing);
    assert_eq!(f.nav.deals().len(), 3);
    assert!(!f.nav.is_title_oscillating());
    assert_eq!(f.nav.frame().title_offset, None);

    f.tick(2000);
    assert!(!f.nav.are_animations_ongoing());
}

#[test]
fn select_opens_detail_with_images() {
    let mut f = Fixture::listing();

    let deals = three_deals();
    assert!(f.nav.select(&deals[1].key));
    assert_eq!(f.nav.mode(), Mode::Detail);
    assert_eq!(f.nav.detail(), Some(&deals[1]));
    assert_eq!(f.nav.image_urls(), Some(&deals[1].media[..]));
    assert_eq!(f.nav.take_fetches(), [Fetch::Detail(deals[1].key.clone())]);
    assert_snapshot!(f.frame(), @"Detail deal:1 at x:0 image:0 at x:0");
}

#[test]
fn select_unknown_key_stays_on_listing() {
    let mut f = Fixture::listing();
    assert!(!f.nav.select(&DealId::from("zzz")));
    assert_eq!(f.nav.mode(), Mode::Listing);
    assert!(f.nav.take_fetches().is_empty());
}

#[test]
fn image_swipe_advances_then_springs_back_at_end() {
    let mut f = Fixture::detail();

    let decision = f.swipe(IMAGE_Y, -0.5 * WIDTH);
    assert!(matches!(
        decision,
        Some(SwipeDecision::Commit {
            direction: Direction::Next,
            ..
        })
    ));
    f.settle();
    assert_snapshot!(f.frame(), @"Detail deal:1 at x:0 image:1 at x:0");

    // There is no third image.
    let decision = f.swipe(IMAGE_Y, -0.5 * WIDTH);
    assert!(matches!(decision, Some(SwipeDecision::Commit { .. })));
    f.tick(16);
    assert!(f.nav.frame().image_offset < 0.);

    f.settle();
    assert_snapshot!(f.frame(), @"Detail deal:1 at x:0 image:1 at x:0");
}

#[test]
fn deal_swipe_opens_neighbor() {
    let mut f = Fixture::detail();

    f.nav.touch_down(DEAL_Y);
    f.nav.touch_move(-100., 0., f.time);
    assert_snapshot!(f.frame(), @"Detail deal:1 at x:-100 image:0 at x:0");

    f.nav.touch_move(-250., 0., f.time);
    f.nav.touch_up(-250., f.time);
    assert_snapshot!(f.frame(), @"Detail deal:1 at x:-250 image:0 at x:0");

    // Once the deal has slid out, the next one comes in from the right edge.
    f.tick(250);
    assert_snapshot!(f.frame(), @"Detail deal:2 at x:400 image:0 at x:0");
    assert_eq!(f.nav.detail().map(|deal| &deal.key), Some(&DealId::from("c")));
    assert_eq!(f.nav.image_urls().map(|urls| urls.len()), Some(3));
    assert_eq!(f.nav.take_fetches(), [Fetch::Detail(DealId::from("c"))]);

    f.settle();
    assert_snapshot!(f.frame(), @"Detail deal:2 at x:0 image:0 at x:0");
}

#[test]
fn vertical_drag_is_left_to_scrolling() {
    let mut f = Fixture::detail();

    f.nav.touch_down(DEAL_Y);
    f.nav.touch_move(10., 40., f.time);
    f.nav.touch_move(20., 80., f.time);
    assert_eq!(f.nav.touch_up(20., f.time), None);
    assert_snapshot!(f.frame(), @"Detail deal:1 at x:0 image:0 at x:0");
}

#[test]
fn touch_in_image_area_never_swipes_deals() {
    let mut f = Fixture::detail();

    f.swipe(IMAGE_Y, 0.5 * WIDTH);
    f.settle();
    // Already on the first image.
    assert_snapshot!(f.frame(), @"Detail deal:1 at x:0 image:0 at x:0");
}

#[test]
fn listing_has_no_swipes() {
    let mut f = Fixture::listing();
    assert_eq!(f.swipe(DEAL_Y, -0.5 * WIDTH), None);
    assert_eq!(f.nav.mode(), Mode::Listing);
    assert!(!f.nav.are_animations_ongoing());
}

#[test]
fn back_returns_to_listing() {
    let mut f = Fixture::detail();
    f.swipe(IMAGE_Y, -0.5 * WIDTH);

    assert!(f.nav.back());
    assert_eq!(f.nav.mode(), Mode::Listing);
    assert_eq!(f.nav.image_urls(), None);
    assert_snapshot!(f.frame(), @"Listing deal:- at x:0 image:- at x:0");

    // The image swipe was torn down along with the detail view.
    f.settle();
    assert!(!f.nav.are_animations_ongoing());
    assert!(!f.nav.back());

    // Selecting again starts from the first image.
    assert!(f.nav.select(&DealId::from("b")));
    assert_snapshot!(f.frame(), @"Detail deal:1 at x:0 image:0 at x:0");
}

#[test]
fn provider_failures_keep_state() {
    let mut f = Fixture::new();
    f.nav.on_initial_deals(Err(anyhow!("offline")));
    assert_eq!(f.nav.mode(), Mode::Splash);
    assert!(f.nav.is_title_oscillating());

    let mut f = Fixture::listing();
    f.nav.search_input("mug");
    f.tick(300);
    assert_eq!(f.nav.take_fetches(), [Fetch::Search(String::from("mug"))]);
    f.nav.on_search_results("mug", Err(anyhow!("timed out")));
    assert_eq!(f.nav.mode(), Mode::Listing);
    assert_eq!(f.nav.deals().len(), 3);

    assert!(f.nav.select(&DealId::from("a")));
    f.nav.on_detail_fetched(Err(anyhow!("not found")));
    assert_eq!(f.nav.detail(), Some(&three_deals()[0]));
}

#[test]
fn detail_response_swaps_matching_deal_only() {
    let mut f = Fixture::detail();

    let mut other = deal("a", "Mug", 1);
    other.description = Some(String::from("Stale"));
    f.nav.on_detail_fetched(Ok(other));
    assert_eq!(f.nav.detail().map(|deal| &deal.key), Some(&DealId::from("b")));
    assert_eq!(f.nav.detail().and_then(|deal| deal.description.clone()), None);

    let mut full = deal("b", "Scarf", 2);
    full.description = Some(String::from("Warm"));
    f.nav.on_detail_fetched(Ok(full.clone()));
    assert_eq!(f.nav.detail(), Some(&full));
}

#[test]
fn detail_with_new_media_recreates_images() {
    let mut f = Fixture::detail();
    f.swipe(IMAGE_Y, -0.5 * WIDTH);
    f.settle();
    assert_eq!(f.nav.frame().image_idx, Some(1));

    f.nav.on_detail_fetched(Ok(deal("b", "Scarf", 4)));
    assert_eq!(f.nav.image_urls().map(|urls| urls.len()), Some(4));
    assert_eq!(f.nav.frame().image_idx, Some(0));
}

#[test]
fn search_is_debounced() {
    let mut f = Fixture::listing();

    f.nav.search_input("m");
    f.tick(100);
    f.nav.search_input("mu");
    f.tick(100);
    f.nav.search_input("mug");
    f.tick(299);
    assert!(f.nav.take_fetches().is_empty());

    f.tick(1);
    assert_eq!(f.nav.take_fetches(), [Fetch::Search(String::from("mug"))]);
    assert_eq!(f.nav.search_term(), "mug");

    f.nav.on_search_results("mug", Ok(vec![deal("a", "Mug", 1)]));
    assert_eq!(f.nav.mode(), Mode::Listing);
    assert_eq!(f.nav.deals().len(), 1);
}

#[test]
fn empty_search_falls_back_to_all_deals() {
    let mut f = Fixture::listing();

    f.nav.search_input("zebra");
    f.tick(300);
    f.nav.take_fetches();
    f.nav.on_search_results("zebra", Ok(vec![]));
    assert_eq!(f.nav.mode(), Mode::Listing);
    assert_eq!(f.nav.deals(), &three_deals()[..]);

    f.nav.search_input("mug");
    f.tick(300);
    f.nav.on_search_results("mug", Ok(vec![deal("a", "Mug", 1)]));
    assert_eq!(f.nav.deals().len(), 1);

    // Clearing the search box shows everything again without asking the provider.
    f.nav.take_fetches();
    f.nav.search_input("");
    f.tick(300);
    assert!(f.nav.take_fetches().is_empty());
    assert_eq!(f.nav.deals().len(), 3);
}

#[test]
fn outdated_search_results_are_ignored() {
    let mut f = Fixture::listing();

    f.nav.search_input("mug");
    f.tick(300);
    f.nav.search_input("tea");
    f.tick(300);
    assert_eq!(
        f.nav.take_fetches(),
        [
            Fetch::Search(String::from("mug")),
            Fetch::Search(String::from("tea"))
        ]
    );

    f.nav.on_search_results("tea", Ok(vec![deal("c", "Tea Set", 3)]));
    f.nav.on_search_results("mug", Ok(vec![deal("a", "Mug", 1)]));
    assert_eq!(f.nav.deals(), &[deal("c", "Tea Set", 3)][..]);
}

#[test]
fn search_results_wait_for_detail_to_close() {
    let mut f = Fixture::detail();

    f.nav.search_input("mug");
    f.tick(300);
    f.nav.on_search_results("mug", Ok(vec![deal("a", "Mug", 1)]));
    assert_eq!(f.nav.mode(), Mode::Detail);
    assert_eq!(f.nav.deals().len(), 3);
    assert_eq!(f.nav.frame().deal_idx, Some(1));

    assert!(f.nav.back());
    assert_eq!(f.nav.deals(), &[deal("a", "Mug", 1)][..]);
}

#[test]
fn searching_from_splash_leaves_it_on_results() {
    let mut f = Fixture::new();
    f.nav.on_initial_deals(Ok(vec![]));

    f.nav.search_input("mug");
    f.tick(300);
    f.nav.on_search_results("mug", Ok(vec![]));
    assert_eq!(f.nav.mode(), Mode::Splash);
    assert!(f.nav.is_title_oscillating());

    f.nav.on_search_results("mug", Ok(vec![deal("a", "Mug", 1)]));
    assert_eq!(f.nav.mode(), Mode::Listing);
    assert!(!f.nav.is_title_oscillating());
}

#[test]
fn back_during_deal_fling_cancels_it() {
    let mut f = Fixture::detail();
    f.swipe(DEAL_Y, -0.5 * WIDTH);
    f.tick(100);
    assert!(f.nav.frame().deal_offset < -0.5 * WIDTH);

    assert!(f.nav.back());
    f.settle();
    assert_eq!(f.nav.mode(), Mode::Listing);
    assert!(f.nav.take_fetches().is_empty());
}

#[test]
fn image_drag_follows_finger() {
    let mut f = Fixture::detail();
    f.nav.touch_down(IMAGE_Y);
    f.nav.touch_move(-30., 5., f.time);
    assert_abs_diff_eq!(f.nav.frame().image_offset, -30.);

    f.nav.touch_cancel();
    f.settle();
    assert_snapshot!(f.frame(), @"Detail deal:1 at x:0 image:0 at x:0");
}
