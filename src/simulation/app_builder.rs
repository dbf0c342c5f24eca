//! Headless App Builder
//!
//! Provides a reusable builder for creating headless Bevy apps that run the
//! full penalty round. Used by the simulation runner, scenario tests, the
//! parallel executor and the session binary.

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use crate::events::EventBus;
use crate::input::capture_input;
use crate::round::{GameRng, KeeperOverride, PenaltyPlugin, PenaltySet};
use crate::tuning::{self, PenaltyTweaks};

use super::kicker_bot::{KickerBot, kicker_bot_update};

/// Builder for creating headless Bevy apps
pub struct HeadlessAppBuilder {
    seed: Option<u64>,
    fps: f32,
    minimal_threads: bool,
    logging: bool,
    tweaks: Option<PenaltyTweaks>,
    keeper_override: KeeperOverride,
    bot: Option<KickerBot>,
}

impl Default for HeadlessAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessAppBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            seed: None,
            fps: 60.0,
            minimal_threads: false,
            logging: false,
            tweaks: None,
            keeper_override: KeeperOverride::default(),
            bot: None,
        }
    }

    /// Seed the game RNG (shots, keeper rolls, patrols)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the simulated frame rate (default: 60)
    pub fn with_fps(mut self, fps: f32) -> Self {
        self.fps = fps;
        self
    }

    /// Enable minimal thread mode (task pools = 1)
    ///
    /// Use this when running many apps in parallel to avoid hitting OS thread limits.
    pub fn with_minimal_threads(mut self) -> Self {
        self.minimal_threads = true;
        self
    }

    /// Add bevy's LogPlugin so `info!`/`debug!` reach the terminal
    pub fn with_logging(mut self) -> Self {
        self.logging = true;
        self
    }

    /// Use these tweaks instead of config/gameplay_tuning.json
    pub fn with_tweaks(mut self, tweaks: PenaltyTweaks) -> Self {
        self.tweaks = Some(tweaks);
        self
    }

    /// Pin keeper skills / reaction time instead of rolling them each round
    pub fn with_keeper_override(mut self, keeper_override: KeeperOverride) -> Self {
        self.keeper_override = keeper_override;
        self
    }

    /// Drive the kicker with a scripted bot
    pub fn with_bot(mut self, bot: KickerBot) -> Self {
        self.bot = Some(bot);
        self
    }

    /// Frame step used by the manual clock
    pub fn frame_time(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.fps.max(1.0))
    }

    /// Build the app with minimal plugins and the penalty round
    ///
    /// The returned app has:
    /// - MinimalPlugins + StatesPlugin, time advanced by a fixed step per update
    /// - PenaltyTweaks from the builder or the global tuning file
    /// - A seeded GameRng when a seed was given
    /// - PenaltyPlugin (state machine, input, keeper, ball, scoring)
    /// - The kicker bot if with_bot() was called
    ///
    /// Callers drive it with `app.update()`.
    pub fn build(self) -> App {
        let frame = self.frame_time();
        let mut app = App::new();

        if self.minimal_threads {
            // Reduce Bevy's internal thread pools to minimum
            app.add_plugins(
                MinimalPlugins
                    .set(ScheduleRunnerPlugin::run_loop(frame))
                    .set(TaskPoolPlugin {
                        task_pool_options: TaskPoolOptions::with_num_threads(1),
                    }),
            );
        } else {
            app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(frame)));
        }
        app.add_plugins(StatesPlugin);
        if self.logging {
            app.add_plugins(LogPlugin::default());
        }
        app.insert_resource(TimeUpdateStrategy::ManualDuration(frame));

        let tweaks = match self.tweaks {
            Some(tweaks) => tweaks,
            None => {
                let mut tweaks = PenaltyTweaks::default();
                if let Err(err) = tuning::apply_global_tuning(&mut tweaks) {
                    warn!("{}, using default tuning", err);
                }
                tweaks
            }
        };
        app.insert_resource(tweaks);
        if let Some(seed) = self.seed {
            app.insert_resource(GameRng::seeded(seed));
        }
        app.insert_resource(self.keeper_override);
        app.insert_resource(EventBus::new());

        app.add_plugins(PenaltyPlugin);

        if let Some(bot) = self.bot {
            app.insert_resource(bot);
            app.add_systems(
                Update,
                kicker_bot_update
                    .in_set(PenaltySet::Input)
                    .before(capture_input),
            );
        }

        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keeper::KeeperSkills;
    use crate::round::GamePhase;
    use crate::scoring::SessionScore;
    use crate::simulation::profiles::KickerProfile;

    #[test]
    fn test_builder_creates_app() {
        let app = HeadlessAppBuilder::new().with_seed(1).build();
        assert!(app.world().contains_resource::<SessionScore>());
        assert!(app.world().contains_resource::<EventBus>());
        assert!(app.world().contains_resource::<PenaltyTweaks>());
    }

    #[test]
    fn test_minimal_threads_creates_app() {
        let mut app = HeadlessAppBuilder::new().with_minimal_threads().build();
        app.update();
        assert_eq!(
            *app.world().resource::<State<GamePhase>>().get(),
            GamePhase::Intro
        );
    }

    #[test]
    fn test_fps_sets_the_fixed_step() {
        let builder = HeadlessAppBuilder::new().with_fps(30.0);
        assert!((builder.frame_time().as_secs_f32() - 1.0 / 30.0).abs() < 1e-4);

        let mut app = builder.with_seed(2).build();
        for _ in 0..10 {
            app.update();
        }
        // 60 fps would only reach ~0.17 s
        let elapsed = app.world().resource::<Time>().elapsed_secs();
        assert!(elapsed > 0.25, "elapsed {}", elapsed);
    }

    #[test]
    fn test_keeper_override_is_inserted() {
        let skills = KeeperSkills {
            reflexes: 0.7,
            positioning: 0.7,
            reach: 0.7,
        };
        let app = HeadlessAppBuilder::new()
            .with_keeper_override(KeeperOverride {
                skills: Some(skills),
                reaction_time: None,
            })
            .build();
        assert_eq!(app.world().resource::<KeeperOverride>().skills, Some(skills));
    }

    #[test]
    fn test_bot_leaves_intro() {
        let mut app = HeadlessAppBuilder::new()
            .with_seed(4)
            .with_bot(KickerBot::new(KickerProfile::default(), 1, 4))
            .build();
        for _ in 0..5 {
            app.update();
        }
        assert_eq!(
            *app.world().resource::<State<GamePhase>>().get(),
            GamePhase::PrePenal
        );
    }
}
