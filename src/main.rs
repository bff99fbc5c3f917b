use std::time::Duration;

use ggez::event::{self, EventHandler};
use ggez::input::keyboard::KeyInput;
use ggez::{Context, GameResult};
use rand::rngs::ThreadRng;

mod config;
mod game;
mod input;
mod persistence;
mod render;
mod sim;
mod state;

use config::Config;
use game::{Control, Game};
use persistence::FileStore;

const WINDOW_TITLE: &str = "Snake - double tap an arrow to speed up";

struct App {
    game: Game<FileStore, ThreadRng>,
}

impl EventHandler for App {
    fn update(&mut self, ctx: &mut Context) -> GameResult {
        let dt: Duration = ctx.time.delta();
        self.game.advance(dt);
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        render::draw(ctx, self.game.state(), self.game.high_score(), self.game.config())
    }

    fn key_down_event(&mut self, ctx: &mut Context, key: KeyInput, repeat: bool) -> GameResult {
        if repeat {
            return Ok(());
        }
        let Some(command) = key.keycode.and_then(input::command_for) else {
            return Ok(());
        };
        if self.game.apply(command) == Control::Quit {
            log::info!("Quit requested");
            ctx.request_quit();
        }
        Ok(())
    }
}

fn main() -> GameResult {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    log::info!(
        "Grid {}x{} cells, high score in {}, saves in {}",
        config.columns(),
        config.rows(),
        config.high_score_path.display(),
        config.save_path.display(),
    );

    let window_setup = ggez::conf::WindowSetup::default()
        .title(WINDOW_TITLE)
        .vsync(true);
    let window_mode = ggez::conf::WindowMode::default()
        .dimensions(config.width as f32, config.height as f32)
        .resizable(false);

    let (ctx, event_loop) = ggez::ContextBuilder::new("snake_resume", "snake_resume")
        .window_setup(window_setup)
        .window_mode(window_mode)
        .build()?;

    let store = FileStore::new(&config);
    let game = Game::new(config, store, rand::thread_rng());
    event::run(ctx, event_loop, App { game })
}
