//! Gridiron Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use glam::Vec3;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlSelectElement,
        KeyboardEvent,
    };

    use gridiron_rush::presenter::{AgentKind, Presenter, palette, present};
    use gridiron_rush::sim::{GameState, MoveIntent, SimRng, Team, TickInput, tick};
    use gridiron_rush::{Tuning, playbook, tuning};

    /// Top-down view of the field: the long axis runs left to right
    struct CanvasView {
        ctx: CanvasRenderingContext2d,
        document: Document,
        width: f64,
        height: f64,
        half_length: f32,
        half_width: f32,
        goal_line: f32,
        yard: f32,
        qb_color: u32,
        /// rAF timestamp of the current frame (ms)
        now: f64,
        message_until: f64,
    }

    impl CanvasView {
        fn new(
            ctx: CanvasRenderingContext2d,
            document: Document,
            width: f64,
            height: f64,
            tuning: &Tuning,
        ) -> Self {
            Self {
                ctx,
                document,
                width,
                height,
                half_length: tuning.half_length(),
                half_width: tuning.half_width(),
                goal_line: tuning.goal_line(),
                yard: tuning.yard_scale,
                qb_color: palette::QB_DEFAULT,
                now: 0.0,
                message_until: 0.0,
            }
        }

        fn to_screen(&self, pos: Vec3) -> (f64, f64) {
            let u = (pos.z + self.half_length) / (2.0 * self.half_length);
            let v = (pos.x + self.half_width) / (2.0 * self.half_width);
            (u as f64 * self.width, v as f64 * self.height)
        }

        /// Screen pixels per world unit
        fn scale(&self) -> f64 {
            self.width / (2.0 * self.half_length as f64)
        }

        fn fill_band(&self, z0: f32, z1: f32, color: u32) {
            let (x0, _) = self.to_screen(Vec3::new(0.0, 0.0, z0));
            let (x1, _) = self.to_screen(Vec3::new(0.0, 0.0, z1));
            self.ctx.set_fill_style_str(&palette::css(color));
            self.ctx.fill_rect(x0.min(x1), 0.0, (x1 - x0).abs(), self.height);
        }

        fn dot(&self, pos: Vec3, radius: f64, color: u32) {
            let (x, y) = self.to_screen(pos);
            self.ctx.set_fill_style_str(&palette::css(color));
            self.ctx.begin_path();
            let _ = self.ctx.arc(x, y, radius.max(2.0), 0.0, TAU);
            self.ctx.fill();
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn expire_message(&self) {
            if self.now >= self.message_until {
                self.set_text("message", "");
            }
        }
    }

    impl Presenter for CanvasView {
        fn begin_frame(&mut self) {
            self.expire_message();

            self.ctx.set_fill_style_str(&palette::css(palette::FIELD));
            self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
            self.fill_band(self.goal_line, self.half_length, palette::HOME);
            self.fill_band(-self.half_length, -self.goal_line, palette::AWAY);

            // Yard lines every 10 yards between the goal lines
            self.ctx.set_stroke_style_str(&palette::css(palette::LINE));
            self.ctx.set_line_width(1.0);
            let step = 10.0 * self.yard;
            let mut z = -self.goal_line;
            while z <= self.goal_line + 0.01 {
                let (x, _) = self.to_screen(Vec3::new(0.0, 0.0, z));
                self.ctx.begin_path();
                self.ctx.move_to(x, 0.0);
                self.ctx.line_to(x, self.height);
                self.ctx.stroke();
                z += step;
            }
        }

        fn draw_agent(&mut self, kind: AgentKind, team: Team, position: Vec3) {
            let (color, size) = match kind {
                AgentKind::Quarterback => (self.qb_color, 3.0),
                AgentKind::Receiver => (palette::team(team), 2.0),
                AgentKind::Defender => (palette::DEFENDER, 2.0),
            };
            self.dot(position, size * self.scale(), color);
        }

        fn draw_ball(&mut self, position: Vec3) {
            // Shadow on the turf, ball drawn larger the higher it flies
            let height = (position.y.max(0.0) as f64 / self.yard as f64).min(20.0);
            self.dot(Vec3::new(position.x, 0.0, position.z), 1.0 * self.scale(), 0x000000);
            self.dot(position, (1.2 + height * 0.1) * self.scale(), palette::BALL);
        }

        fn show_message(&mut self, text: &str, duration_ms: u32) {
            self.set_text("message", text);
            self.message_until = self.now + duration_ms as f64;
        }

        fn update_scoreboard(&mut self, home: u32, away: u32) {
            self.set_text("homeScore", &home.to_string());
            self.set_text("awayScore", &away.to_string());
        }

        fn set_team_color(&mut self, team: Team) {
            self.qb_color = palette::team(team);
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        rng: SimRng,
        /// Commands queued since the last frame
        input: TickInput,
        held: HashSet<String>,
        last_time: f64,
        view: CanvasView,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            let mut input = std::mem::take(&mut self.input);
            input.movement = MoveIntent {
                forward: self.held.contains("w"),
                back: self.held.contains("s"),
                left: self.held.contains("a"),
                right: self.held.contains("d"),
            };
            tick(&mut self.state, &input, dt, &mut self.rng);

            let events = self.state.drain_events();
            self.view.now = time;
            present(&self.state, &events, &mut self.view);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger already set: {e}").into());
        }

        log::info!("Gridiron Rush starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("#canvas is not a canvas"))?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = canvas.client_width() as f64 * dpr;
        let height = canvas.client_height() as f64 * dpr;
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("unexpected context type"))?;

        let tuning = tuning::load_from_page();
        let book = playbook::load_from_page();
        let seed = js_sys::Date::now() as u64;
        let view = CanvasView::new(ctx, document.clone(), width, height, &tuning);

        let state = GameState::with_config(seed, tuning, book);
        populate_play_select(&document, &state)?;

        let game = Rc::new(RefCell::new(Game {
            rng: SimRng::seeded(seed),
            state,
            input: TickInput::default(),
            held: HashSet::new(),
            last_time: 0.0,
            view,
        }));
        game.borrow_mut().state.publish_score();

        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(game.clone())?;
        setup_buttons(&document, game.clone())?;
        setup_selects(&document, game.clone())?;

        request_animation_frame(game);

        log::info!("Gridiron Rush running!");
        Ok(())
    }

    /// Fill the play menu from the playbook, grouped by family
    fn populate_play_select(document: &Document, state: &GameState) -> Result<(), JsValue> {
        let Some(select) = document.get_element_by_id("playSelect") else {
            return Ok(());
        };
        select.set_inner_html("");
        for (family, plays) in state.playbook.families() {
            let group = document.create_element("optgroup")?;
            group.set_attribute("label", family)?;
            for play in plays {
                let option = document.create_element("option")?;
                option.set_attribute("value", &play.name)?;
                option.set_text_content(Some(&play.name));
                group.append_child(&option)?;
            }
            select.append_child(&group)?;
        }
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key().to_lowercase();
                match key.as_str() {
                    "w" | "a" | "s" | "d" => {
                        g.held.insert(key.clone());
                    }
                    "1" | "2" | "3" | "4" => {
                        if let Ok(n) = key.parse::<usize>() {
                            g.input.select_receiver = Some(n - 1);
                        }
                    }
                    "p" => g.input.attempt_pass = true,
                    " " => {
                        event.prevent_default();
                        g.input.start_play = true;
                    }
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().held.remove(&event.key().to_lowercase());
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn on_click(
        document: &Document,
        id: &str,
        game: Rc<RefCell<Game>>,
        apply: fn(&mut TickInput),
    ) -> Result<(), JsValue> {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("No #{} button on the page", id);
            return Ok(());
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            apply(&mut game.borrow_mut().input);
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        on_click(document, "startBtn", game.clone(), |input| {
            input.start_play = true
        })?;
        on_click(document, "resetBtn", game, |input| input.reset_all = true)
    }

    fn on_change(
        element: Element,
        game: Rc<RefCell<Game>>,
        apply: fn(&mut TickInput, String),
    ) -> Result<(), JsValue> {
        let select: HtmlSelectElement = element
            .dyn_into()
            .map_err(|_| JsValue::from_str("expected a <select>"))?;
        let target = select.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            apply(&mut game.borrow_mut().input, target.value());
        });
        select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_selects(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        if let Some(el) = document.get_element_by_id("teamSelect") {
            on_change(el, game.clone(), |input, value| {
                input.select_team = Team::parse(&value);
            })?;
        }
        if let Some(el) = document.get_element_by_id("playSelect") {
            on_change(el, game, |input, value| input.call_play = Some(value))?;
        }
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

/// Headless demo: snap, throw, and play it out to the reset
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use gridiron_rush::presenter::{LogPresenter, present};
    use gridiron_rush::sim::{GameState, PlayPhase, SimRng, TickInput, tick};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    log::info!("Gridiron Rush (native) demo, seed {}", seed);

    let mut state = GameState::new(seed);
    let mut rng = SimRng::seeded(seed);
    let mut presenter = LogPresenter::default();
    let dt = 1.0 / 60.0;

    let script = [
        (0, TickInput {
            start_play: true,
            ..Default::default()
        }),
        (45, TickInput {
            select_receiver: Some(1),
            ..Default::default()
        }),
        (60, TickInput {
            attempt_pass: true,
            ..Default::default()
        }),
    ];

    let mut snapped = false;
    for frame in 0..1200 {
        let input = script
            .iter()
            .find(|(at, _)| *at == frame)
            .map(|(_, input)| input.clone())
            .unwrap_or_default();
        tick(&mut state, &input, dt, &mut rng);
        let events = state.drain_events();
        present(&state, &events, &mut presenter);

        snapped |= state.phase == PlayPhase::Active;
        if snapped && state.phase == PlayPhase::Idle {
            break;
        }
    }

    log::info!(
        "Demo over after {} frames: HOME {} - AWAY {}",
        presenter.frames,
        state.score.home,
        state.score.away
    );
}
