#![allow(dead_code)]

pub mod mock_device;

use kodivoice::core::TextNormalizer;
use kodivoice::library::{Addon, Channel, ChannelGroup, Episode, Movie, TvShow};
use kodivoice::players::MediaDevice;
use kodivoice::processor::Processor;
use kodivoice::utils::FuzzyMatcher;
use mock_device::MockDevice;
use std::collections::HashMap;
use std::sync::Arc;

pub struct TestContext {
    pub device: Arc<MockDevice>,
    pub processor: Arc<Processor>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_device(sample_device())
    }

    pub fn with_device(device: MockDevice) -> Self {
        Self::build(device, TextNormalizer::default(), false)
    }

    pub fn with_tv_activation(device: MockDevice) -> Self {
        Self::build(device, TextNormalizer::default(), true)
    }

    /// Sample library with voice corrections configured
    pub fn with_corrections(corrections: &[(&str, &str)]) -> Self {
        let corrections: HashMap<String, String> = corrections
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        Self::build(sample_device(), TextNormalizer::new(corrections), false)
    }

    fn build(device: MockDevice, normalizer: TextNormalizer, activate_tv: bool) -> Self {
        let device = Arc::new(device);
        let dyn_device: Arc<dyn MediaDevice> = device.clone();
        let processor = Processor::new(dyn_device, FuzzyMatcher::default(), normalizer)
            .with_tv_activation(activate_tv);
        Self {
            device,
            processor: Arc::new(processor),
        }
    }
}

/// Let detached dispatch tasks run to completion
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

pub fn episode(id: i64, season: u32, number: u32, playcount: u32) -> Episode {
    Episode {
        id,
        label: format!("{}x{:02}", season, number),
        showtitle: String::new(),
        season,
        episode: number,
        playcount,
    }
}

/// A small library with movies, shows, PVR channels and addons
pub fn sample_device() -> MockDevice {
    let mut device = MockDevice::new();

    device.movies = vec![
        Movie {
            id: 1,
            label: "The Matrix".into(),
        },
        Movie {
            id: 2,
            label: "The Dark Knight".into(),
        },
        Movie {
            id: 3,
            label: "Alien".into(),
        },
    ];

    device.shows = vec![
        TvShow {
            id: 10,
            label: "Futurama".into(),
        },
        TvShow {
            id: 11,
            label: "Breaking Bad".into(),
        },
        TvShow {
            id: 12,
            label: "The Wire".into(),
        },
    ];

    device.episodes = HashMap::from([
        (
            10,
            vec![
                episode(1001, 1, 1, 1),
                episode(1002, 1, 2, 0),
                episode(1003, 1, 3, 0),
            ],
        ),
        (
            11,
            vec![
                episode(2101, 1, 1, 1),
                episode(2201, 2, 1, 1),
                episode(2204, 2, 4, 2),
            ],
        ),
    ]);

    device.groups = vec![
        ChannelGroup {
            id: 1,
            label: "A".into(),
        },
        ChannelGroup {
            id: 2,
            label: "B".into(),
        },
        ChannelGroup {
            id: 3,
            label: "C".into(),
        },
    ];

    device.channels = HashMap::from([
        (
            1,
            vec![
                Channel {
                    id: 10,
                    label: "News 24".into(),
                    number: 1,
                },
                Channel {
                    id: 11,
                    label: "Weather".into(),
                    number: 2,
                },
            ],
        ),
        (
            2,
            vec![Channel {
                id: 20,
                label: "Sports 1".into(),
                number: 5,
            }],
        ),
        (
            3,
            vec![Channel {
                id: 30,
                label: "Sports 2".into(),
                number: 6,
            }],
        ),
    ]);

    device.addons = vec![
        Addon {
            id: "plugin.video.youtube".into(),
            addon_type: "xbmc.python.pluginsource".into(),
        },
        Addon {
            id: "plugin.video.vimeo".into(),
            addon_type: "xbmc.python.pluginsource".into(),
        },
    ];

    device
}
