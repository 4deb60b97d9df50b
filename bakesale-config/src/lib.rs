#[macro_use]
extern crate tracing;

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use miette::{Context as _, IntoDiagnostic as _};

pub mod animations;
pub mod gestures;
pub mod misc;
pub mod utils;

pub use crate::animations::{Animation, Animations};
pub use crate::gestures::Gestures;
pub use crate::misc::{Search, Splash};
pub use crate::utils::FloatOrInt;

#[derive(knuffel::Decode, Debug, Default, Clone, PartialEq)]
pub struct Config {
    #[knuffel(child, default)]
    pub animations: Animations,
    #[knuffel(child, default)]
    pub gestures: Gestures,
    #[knuffel(child, default)]
    pub search: Search,
    #[knuffel(child, default)]
    pub splash: Splash,
}

#[derive(Debug, Clone)]
pub enum ConfigPath {
    /// Explicitly set config path.
    ///
    /// Load the config only from this path, a missing file is an error.
    Explicit(PathBuf),

    /// Default config path, usually `$XDG_CONFIG_HOME/bakesale/config.kdl`.
    ///
    /// A missing file means the default config.
    Regular(PathBuf),
}

impl Config {
    pub fn load(path: &Path) -> miette::Result<Self> {
        let contents = fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("error reading {path:?}"))?;

        let config = Self::parse(
            path.file_name()
                .and_then(OsStr::to_str)
                .unwrap_or("config.kdl"),
            &contents,
        )
        .context("error parsing")?;
        debug!("loaded config from {path:?}");
        Ok(config)
    }

    pub fn parse(filename: &str, text: &str) -> Result<Self, knuffel::Error> {
        let _span = tracy_client::span!("Config::parse");
        knuffel::parse(filename, text)
    }
}

impl ConfigPath {
    /// Loads the config, falling back to defaults when a regular path doesn't exist.
    pub fn load(&self) -> miette::Result<Config> {
        match self {
            ConfigPath::Explicit(path) => Config::load(path),
            ConfigPath::Regular(path) => {
                if path.exists() {
                    Config::load(path)
                } else {
                    debug!("{path:?} doesn't exist, using the default config");
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ConfigPath::Explicit(path) | ConfigPath::Regular(path) => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_debug_snapshot;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::animations::{Curve, EasingParams, Kind, SpringParams};

    #[track_caller]
    fn do_parse(text: &str) -> Config {
        Config::parse("test.kdl", text)
            .map_err(miette::Report::new)
            .unwrap()
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(do_parse(""), Config::default());
    }

    #[test]
    fn default_swipe_values() {
        let config = Config::default();
        assert_eq!(config.gestures.commit_threshold.0, 0.4);
        assert_eq!(config.gestures.horizontal_dominance.0, 3.);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(
            config.animations.swipe_fling.0.kind,
            Kind::Easing(EasingParams {
                duration_ms: 250,
                curve: Curve::EaseInCubic,
            })
        );
    }

    #[test]
    fn parse() {
        let parsed = do_parse(
            r##"
            animations {
                slowdown 2

                swipe-fling {
                    duration-ms 120
                    curve "linear"
                }

                swipe-snap-back {
                    spring damping-ratio=0.8 stiffness=600 epsilon=0.001
                }

                carousel-entry {
                    off
                }

                title-oscillation {
                    curve "ease-out-quad"
                }
            }

            gestures {
                commit-threshold 0.25
                horizontal-dominance 2
                deal-swipe-min-y 180.5
            }

            search {
                debounce-ms 150
            }

            splash {
                title-margin 100
            }
            "##,
        );

        assert_debug_snapshot!(parsed, @r#"
        Config {
            animations: Animations {
                off: false,
                slowdown: FloatOrInt(
                    2.0,
                ),
                swipe_fling: SwipeFlingAnim(
                    Animation {
                        off: false,
                        kind: Easing(
                            EasingParams {
                                duration_ms: 120,
                                curve: Linear,
                            },
                        ),
                    },
                ),
                swipe_snap_back: SwipeSnapBackAnim(
                    Animation {
                        off: false,
                        kind: Spring(
                            SpringParams {
                                damping_ratio: 0.8,
                                stiffness: 600,
                                epsilon: 0.001,
                            },
                        ),
                    },
                ),
                carousel_entry: CarouselEntryAnim(
                    Animation {
                        off: true,
                        kind: Spring(
                            SpringParams {
                                damping_ratio: 1.0,
                                stiffness: 800,
                                epsilon: 0.0001,
                            },
                        ),
                    },
                ),
                title_oscillation: TitleOscillationAnim(
                    Animation {
                        off: false,
                        kind: Easing(
                            EasingParams {
                                duration_ms: 1000,
                                curve: EaseOutQuad,
                            },
                        ),
                    },
                ),
            },
            gestures: Gestures {
                commit_threshold: FloatOrInt(
                    0.25,
                ),
                horizontal_dominance: FloatOrInt(
                    2.0,
                ),
                deal_swipe_min_y: FloatOrInt(
                    180.5,
                ),
            },
            search: Search {
                debounce_ms: 150,
            },
            splash: Splash {
                title_margin: FloatOrInt(
                    100.0,
                ),
            },
        }
        "#);
    }

    #[test]
    fn spring_defaults_fill_in_easing() {
        let parsed = do_parse(
            r#"
            animations {
                swipe-snap-back {
                    duration-ms 400
                }
            }
            "#,
        );

        assert_eq!(
            parsed.animations.swipe_snap_back.0.kind,
            Kind::Easing(EasingParams {
                duration_ms: 400,
                curve: Curve::EaseOutCubic,
            })
        );
        assert_eq!(
            parsed.animations.carousel_entry.0.kind,
            Kind::Spring(SpringParams {
                damping_ratio: 1.,
                stiffness: 800,
                epsilon: 0.0001,
            })
        );
    }

    #[test]
    fn spring_and_easing_together_is_error() {
        let res = Config::parse(
            "test.kdl",
            r#"
            animations {
                swipe-fling {
                    duration-ms 100
                    spring damping-ratio=1.0 stiffness=800 epsilon=0.0001
                }
            }
            "#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn commit_threshold_out_of_range_is_error() {
        let res = Config::parse("test.kdl", "gestures { commit-threshold 1.5; }");
        assert!(res.is_err());
    }

    #[test]
    fn spring_stiffness_out_of_range_is_error() {
        let res = Config::parse(
            "test.kdl",
            r#"
            animations {
                carousel-entry {
                    spring damping-ratio=20.0 stiffness=800 epsilon=0.0001
                }
            }
            "#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn missing_regular_path_is_default() {
        let path = ConfigPath::Regular(PathBuf::from("/nonexistent/bakesale/config.kdl"));
        assert_eq!(path.load().unwrap(), Config::default());
    }

    #[test]
    fn missing_explicit_path_is_error() {
        let path = ConfigPath::Explicit(PathBuf::from("/nonexistent/bakesale/config.kdl"));
        assert!(path.load().is_err());
    }

    #[test]
    fn config_path_reports_either_kind() {
        let file = PathBuf::from("/etc/bakesale/config.kdl");
        assert_eq!(ConfigPath::Explicit(file.clone()).path(), file.as_path());
        assert_eq!(ConfigPath::Regular(file.clone()).path(), file.as_path());
    }
}
