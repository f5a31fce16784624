use crate::config::HostConfig;
use crate::settings;
use crate::utils::*;
use chrono::prelude::*;
use clap::Args;
use gloo::timers::callback::{Interval, Timeout};
use pairs_core as game;
use yew::prelude::*;

fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewCardState {
    FaceDown,
    FaceUp,
    Matched,
    /// Face up and about to be turned back.
    Mismatched,
}

impl ViewCardState {
    fn is_face_up(self) -> bool {
        !matches!(self, Self::FaceDown)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct ViewCard {
    identity: game::CardIdentity,
    state: ViewCardState,
}

/// Turns engine notifications into what the board shows, the engine itself knows nothing about the DOM.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct BoardPresenter {
    cards: Vec<ViewCard>,
    moves: game::MoveCount,
    score: game::Score,
    summary: Option<game::RoundSummary>,
}

impl BoardPresenter {
    fn card(&self, position: game::Position) -> Option<ViewCard> {
        self.cards.get(usize::from(position)).copied()
    }

    fn set_state(&mut self, position: game::Position, state: ViewCardState) {
        if let Some(card) = self.cards.get_mut(usize::from(position)) {
            card.state = state;
        }
    }
}

impl game::RoundObserver for BoardPresenter {
    fn notify(&mut self, event: game::RoundEvent) {
        use game::RoundEvent::*;

        log::trace!("round event: {:?}", event);
        match event {
            DeckReady(cards) => {
                self.cards = cards
                    .iter()
                    .map(|card| ViewCard {
                        identity: card.identity,
                        state: ViewCardState::FaceDown,
                    })
                    .collect();
                self.moves = 0;
                self.score = 0;
                self.summary = None;
            }
            CardFlipped(position) => self.set_state(position, ViewCardState::FaceUp),
            CardsMatched(positions) => {
                for position in positions {
                    self.set_state(position, ViewCardState::Matched);
                }
            }
            CardsMismatched(positions) => {
                for position in positions {
                    self.set_state(position, ViewCardState::Mismatched);
                }
            }
            MismatchResolved(positions) => {
                for position in positions {
                    if matches!(
                        self.card(position),
                        Some(ViewCard {
                            state: ViewCardState::Mismatched,
                            ..
                        })
                    ) {
                        self.set_state(position, ViewCardState::FaceDown);
                    }
                }
            }
            MoveCountChanged(moves) => self.moves = moves,
            ScoreChanged(score) => self.score = score,
            RoundComplete(summary) => self.summary = Some(summary),
        }
    }
}

/// Wall-clock time of a round, running from the first flip until the last pair is found.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct RoundClock {
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl RoundClock {
    fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    fn on_flip(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    fn stop(&mut self, now: DateTime<Utc>) {
        if self.ended_at.is_none() {
            self.started_at.get_or_insert(now);
            self.ended_at = Some(now);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Select(game::Position),
    ResolveMismatch(game::PendingReset),
    UpdateTime,
    Restart,
    ToggleSettings,
    UpdateSettings(settings::Settings),
    DismissSummary,
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    position: game::Position,
    symbol: AttrValue,
    state: ViewCardState,
    #[prop_or_default]
    locked: bool,
    callback: Callback<game::Position>,
}

#[function_component(CardView)]
fn card_component(props: &CardProps) -> Html {
    use ViewCardState::*;

    let CardProps {
        position,
        symbol,
        state,
        locked,
        callback,
    } = props.clone();

    let class = classes!(
        "card",
        match state {
            FaceDown => classes!(),
            FaceUp => classes!("flipped"),
            Matched => classes!("flipped", "matched"),
            Mismatched => classes!("flipped", "wrong"),
        },
        locked.then_some("locked")
    );

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("card {} clicked", position);
        callback.emit(position);
    });

    html! {
        <button {class} {onclick}>
            <span class="face">{ if state.is_face_up() { symbol.to_string() } else { String::new() } }</span>
        </button>
    }
}

#[derive(Properties, PartialEq)]
struct SummaryProps {
    summary: game::RoundSummary,
    elapsed_secs: u32,
    on_restart: Callback<MouseEvent>,
    on_close: Callback<MouseEvent>,
}

#[function_component(RoundCompleteView)]
fn round_complete_component(props: &SummaryProps) -> Html {
    let game::RoundSummary {
        level,
        moves,
        score,
    } = props.summary;

    html! {
        <dialog id="round-complete" open={true}>
            <article>
                <h2>{"All pairs found!"}</h2>
                <dl>
                    <dt>{"Level"}</dt><dd>{level.name()}</dd>
                    <dt>{"Moves"}</dt><dd>{moves}</dd>
                    <dt>{"Score"}</dt><dd>{score}</dd>
                    <dt>{"Time"}</dt><dd>{format_clock(props.elapsed_secs)}</dd>
                </dl>
                <footer>
                    <button type="reset" onclick={props.on_close.clone()}>{"Close"}</button>
                    <button onclick={props.on_restart.clone()}>{"Play again"}</button>
                </footer>
            </article>
        </dialog>
    }
}

#[derive(Args, Properties, Debug, Default, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<String>,
}

impl GameProps {
    fn seed(&self) -> u64 {
        match self.seed.as_deref().map(str::parse::<u64>) {
            Some(Ok(seed)) => seed,
            Some(Err(err)) => {
                log::warn!("ignoring seed {:?}: {}", self.seed, err);
                js_random_seed()
            }
            None => js_random_seed(),
        }
    }
}

pub(crate) struct GameView {
    config: Option<HostConfig>,
    settings: settings::Settings,
    engine: Option<game::MatchEngine>,
    presenter: BoardPresenter,
    clock: RoundClock,
    prev_time: u32,
    settings_open: bool,
    summary_open: bool,
    mismatch_timer: Option<Timeout>,
    _timer_interval: Interval,
}

impl GameView {
    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(500, move || link.send_message(Msg::UpdateTime))
    }

    fn schedule_reset(ctx: &Context<Self>, pending: game::PendingReset) -> Timeout {
        let link = ctx.link().clone();
        let millis = u32::try_from(pending.delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || link.send_message(Msg::ResolveMismatch(pending)))
    }

    /// Clears per-round view state, the engine decides whether a new deck is actually dealt.
    fn reset_round_view(&mut self) {
        // dropping the timeout cancels it, the engine would discard it anyway
        self.mismatch_timer = None;
        self.clock = RoundClock::default();
        self.prev_time = 0;
        self.summary_open = false;
    }

    fn start_round(&mut self, level: game::Level) -> bool {
        let (Some(config), Some(engine)) = (&self.config, &mut self.engine) else {
            return false;
        };
        let preset = config.preset(level);
        match engine.change_difficulty(preset, &mut self.presenter) {
            Ok(()) => {
                self.reset_round_view();
                true
            }
            Err(err) => {
                log::error!("could not start a {} round: {}", level, err);
                false
            }
        }
    }

    fn restart(&mut self) -> bool {
        let Some(engine) = &mut self.engine else {
            return false;
        };
        match engine.restart(&mut self.presenter) {
            Ok(()) => {
                self.reset_round_view();
                true
            }
            Err(err) => {
                log::error!("could not restart round: {}", err);
                false
            }
        }
    }

    fn select(&mut self, ctx: &Context<Self>, position: game::Position) -> bool {
        use game::SelectOutcome::*;

        let Some(engine) = &mut self.engine else {
            return false;
        };
        let now = utc_now();
        let outcome = engine.select(position, &mut self.presenter);
        log::debug!("select {}: {:?}", position, outcome);

        match outcome {
            Ignored => return false,
            Flipped | Matched => {}
            Mismatched(pending) => {
                self.mismatch_timer = Some(Self::schedule_reset(ctx, pending));
            }
            Completed => {
                self.clock.stop(now);
                self.summary_open = true;
            }
        }
        self.clock.on_flip(now);
        true
    }

    fn resolve_mismatch(&mut self, pending: game::PendingReset) -> bool {
        self.mismatch_timer = None;
        self.engine
            .as_mut()
            .is_some_and(|engine| engine.resolve_mismatch(pending, &mut self.presenter).has_update())
    }

    fn get_time(&self) -> u32 {
        self.clock.elapsed_secs(utc_now())
    }

    fn grid_size(&self) -> u8 {
        self.engine
            .as_ref()
            .and_then(|engine| engine.preset())
            .map_or(0, |preset| preset.grid_size)
    }

    fn get_round_state_class(&self) -> Classes {
        use game::RoundPhase::*;

        let Some(engine) = &self.engine else {
            return classes!("broken");
        };
        classes!(match engine.phase() {
            _ if engine.is_locked() => "locked",
            Idle => "not-started",
            AwaitingFirstSelection | AwaitingSecondSelection => "in-progress",
            Complete => "win",
        })
    }

    fn symbol_at(&self, identity: game::CardIdentity) -> AttrValue {
        self.config
            .as_ref()
            .and_then(|config| config.symbols.symbol(identity))
            .map_or_else(AttrValue::default, |symbol| AttrValue::from(symbol.to_string()))
    }

    fn view_board(&self, ctx: &Context<Self>) -> Html {
        let Some(engine) = &self.engine else {
            return html! {
                <p class="error">{"The game could not be configured, see the console for details."}</p>
            };
        };
        let locked = engine.is_locked() || !engine.phase().is_playing();
        let style = format!("grid-template-columns: repeat({}, 1fr)", self.grid_size().max(1));

        html! {
            <section class={classes!("board", (!locked).then_some("playable"))} {style}>
                {
                    for self.presenter.cards.iter().zip(0..game::Position::MAX).map(|(card, position)| {
                        let symbol = self.symbol_at(card.identity);
                        let state = card.state;
                        let callback = ctx.link().callback(Msg::Select);
                        html! {
                            <CardView {position} {symbol} {state} {locked} {callback}/>
                        }
                    })
                }
            </section>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config = HostConfig::builtin()
            .inspect_err(|err| log::error!("{:#}", err))
            .ok();
        let engine = config
            .as_ref()
            .map(|config| game::MatchEngine::new(config.symbols.clone(), ctx.props().seed()));
        let settings: settings::Settings = LocalOrDefault::local_or_default();

        let mut view = Self {
            config,
            settings,
            engine,
            presenter: BoardPresenter::default(),
            clock: RoundClock::default(),
            prev_time: 0,
            settings_open: false,
            summary_open: false,
            mismatch_timer: None,
            _timer_interval: GameView::create_timer(ctx),
        };
        view.start_round(settings.level);
        view
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Select(position) => self.select(ctx, position),
            ResolveMismatch(pending) => self.resolve_mismatch(pending),
            UpdateTime => {
                let time = self.get_time();
                if self.prev_time != time {
                    self.prev_time = time;
                    true
                } else {
                    false
                }
            }
            Restart => self.restart(),
            ToggleSettings => {
                self.settings_open = !self.settings_open;
                true
            }
            UpdateSettings(settings) => {
                self.settings_open = false;
                if self.settings != settings {
                    log::debug!("difficulty changed to {}", settings.level);
                    self.settings = settings;
                    self.settings.local_save();
                    self.start_round(settings.level);
                }
                true
            }
            DismissSummary => {
                self.summary_open = false;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use settings::SettingsView;
        use Msg::*;

        let round_state_class = self.get_round_state_class();
        let moves = format_for_counter(self.presenter.moves);
        let score = format_for_counter(self.presenter.score);
        let elapsed_time = format_clock(self.get_time());

        let cb_restart = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Restart
        });
        let cb_show_settings = ctx.link().callback(|_| ToggleSettings);
        let cb_apply_settings = ctx.link().callback(UpdateSettings);
        let cb_close_settings = ctx.link().callback(|_| ToggleSettings);
        let presets = self
            .config
            .as_ref()
            .map(|config| config.presets)
            .unwrap_or_default();

        let summary = self
            .presenter
            .summary
            .filter(|_| self.summary_open)
            .map(|summary| {
                let on_close = ctx.link().callback(|_| DismissSummary);
                let on_restart = cb_restart.clone();
                let elapsed_secs = self.get_time();
                html! {
                    <Modal>
                        <RoundCompleteView {summary} {elapsed_secs} {on_restart} {on_close}/>
                    </Modal>
                }
            });

        html! {
            <div class="pairs">
                <small onclick={cb_show_settings}>{"···"}</small>
                <nav>
                    <aside title="Moves">{moves}</aside>
                    <aside title="Score">{score}</aside>
                    <span><button class={round_state_class} onclick={cb_restart}/></span>
                    <aside title="Time">{elapsed_time}</aside>
                </nav>
                { self.view_board(ctx) }
                <SettingsView
                    open={self.settings_open}
                    settings={self.settings}
                    {presets}
                    on_apply={cb_apply_settings}
                    on_close={cb_close_settings}
                />
                { for summary }
            </div>
        }
    }
}
