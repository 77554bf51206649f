//! Glue between player actions, the session and the save data.

use std::time::Duration;

use hellas_quest_core::{Command, Event};
use hellas_quest_persistence::{Gateway, KeyValueStore};
use hellas_quest_rendering::{FrameInput, PlayerAction, Scene};
use hellas_quest_session::{self as session, query, Session};
use tracing::{debug, error};

/// Drives a [`Session`] from frame input and mirrors progress into a store.
#[derive(Debug)]
pub(crate) struct App<S> {
    session: Session,
    gateway: Gateway<S>,
}

impl<S: KeyValueStore> App<S> {
    pub(crate) const fn new(session: Session, gateway: Gateway<S>) -> Self {
        Self { session, gateway }
    }

    pub(crate) fn banner(&self) -> &'static str {
        query::welcome_banner(&self.session)
    }

    /// Scene matching the current session state.
    pub(crate) fn scene(&self) -> Scene {
        let mut scene = Scene::new(query::hud(&self.session));
        self.sync(&mut scene);
        scene
    }

    /// Advances the session by `dt`, then applies the actions in `input`.
    pub(crate) fn frame(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        let mut events = Vec::new();
        if !dt.is_zero() {
            session::apply(&mut self.session, Command::Tick { dt }, &mut events);
        }
        for action in input.actions {
            let command = self.command_for(action);
            debug!(?action, ?command, "player action");
            session::apply(&mut self.session, command, &mut events);
        }
        if input.exit_requested && query::phase(&self.session).is_in_quest() {
            session::apply(&mut self.session, Command::EndSession, &mut events);
        }

        self.save(&events);
        scene.advance(dt);
        scene.absorb(&events);
        self.sync(scene);
    }

    fn command_for(&self, action: PlayerAction) -> Command {
        match action {
            PlayerAction::ChooseDifficulty(difficulty) => Command::SelectDifficulty { difficulty },
            PlayerAction::ChooseCategory(category) => Command::SelectCategory { category },
            PlayerAction::ChooseCharacter(character) => Command::SelectCharacter { character },
            PlayerAction::BeginQuest => Command::StartSession,
            PlayerAction::Answer(option) => Command::SubmitAnswer { option },
            PlayerAction::UsePowerUp(kind) => Command::ActivatePowerUp { kind },
            PlayerAction::Quit => Command::EndSession,
            PlayerAction::PlayAgain => Command::Restart {
                lifetime: self.gateway.load(),
            },
        }
    }

    fn save(&mut self, events: &[Event]) {
        if let Err(error) = self
            .gateway
            .record(events, query::lifetime(&self.session))
        {
            error!(%error, "failed to save progress");
        }
    }

    fn sync(&self, scene: &mut Scene) {
        scene.sync(
            query::hud(&self.session),
            query::current_question(&self.session),
            query::power_up_buttons(&self.session),
        );
    }
}
