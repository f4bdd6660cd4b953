mod carousel;
mod driver;
mod error;
mod field;
mod follower;
mod image_loader;
mod noise;
mod palette;
mod parameters;
mod scene;
mod showcase;
mod style;
mod viewport;

use std::time::Instant;

use iced::button::{self, Button};
use iced::canvas::Canvas;
use iced::time;
use iced::{
    Align, Application, Clipboard, Column, Command, Container, Element, Length, Row, Settings,
    Subscription,
};
use iced_native::keyboard::{self, KeyCode};
use iced_native::{mouse, window, Event};

use crate::driver::Driver;
use crate::palette::ThemeMode;
use crate::parameters::Parameters;
use crate::scene::Scene;
use crate::viewport::Viewport;

const PARAMETERS_PATH: &str = "parameters.json";
const WINDOW_SIZE: (u32, u32) = (1280, 800);
const CONTROLS_HEIGHT: u16 = 40;

#[derive(Clone, Debug)]
pub enum Message {
    Frame(Instant),
    Event(Event),
    Previous,
    Next,
    ToggleTheme,
    ParametersChanged(Parameters),
}

#[derive(Default)]
struct Controls {
    previous_button: button::State,
    next_button: button::State,
    theme_button: button::State,
}

struct Backdrop {
    parameters: Parameters,
    scene: Scene,
    driver: Driver,
    controls: Controls,
    running: bool,
    exited: bool,
}

impl Backdrop {
    fn viewport(parameters: &Parameters, width: f32, height: f32) -> Viewport {
        Viewport::new(width, height, parameters.scale_factor)
    }

    /// The canvas sits above the control row, so it gets the window minus
    /// the row's fixed height.
    fn canvas_size(width: u32, height: u32) -> (f32, f32) {
        (
            width as f32,
            height.saturating_sub(CONTROLS_HEIGHT as u32) as f32,
        )
    }

    fn start(&mut self, parameters: Parameters) {
        let current = self.scene.viewport();
        let viewport = Self::viewport(&parameters, current.width, current.height);
        self.scene.stop();
        self.scene = Scene::new(parameters.clone(), viewport);
        self.scene.start();
        self.parameters = parameters;
        self.driver = Driver::new(self.parameters.frame_interval() * 8);
        self.running = true;
    }

    fn teardown(&mut self) {
        log::info!("tearing down after {} frames", self.driver.frames());
        self.scene.stop();
        self.driver.sleep();
        self.running = false;
        self.exited = true;
    }

    fn frame(&mut self, now: Instant) {
        let mut simulations = self.scene.simulations();
        self.driver.frame(now, &mut simulations);
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Window(window::Event::Resized { width, height }) => {
                let (width, height) = Self::canvas_size(width, height);
                self.scene.resize(width, height);
            }
            Event::Mouse(mouse::Event::CursorMoved { position }) => {
                self.scene.pointer_moved(position);
            }
            Event::Mouse(mouse::Event::CursorLeft) => {
                self.scene.pointer_left();
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = self.scene.pointer();
                self.scene.pressed(position);
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                self.scene.released();
            }
            Event::Keyboard(keyboard::Event::KeyPressed { key_code, .. }) => match key_code {
                KeyCode::T => self.toggle_theme(),
                KeyCode::Left => self.scene.navigate(false),
                KeyCode::Right => self.scene.navigate(true),
                KeyCode::Escape => self.teardown(),
                _ => return,
            },
            _ => return,
        }
        self.driver.wake();
    }

    fn toggle_theme(&mut self) {
        let mode = self.scene.mode().toggled();
        self.scene.set_theme(mode);
    }
}

impl Application for Backdrop {
    type Executor = iced::executor::Default;
    type Message = Message;
    type Flags = ();

    fn new(_flags: Self::Flags) -> (Self, Command<Message>) {
        let parameters = Parameters::default();
        let (width, height) = Self::canvas_size(WINDOW_SIZE.0, WINDOW_SIZE.1);
        let viewport = Self::viewport(&parameters, width, height);
        let driver = Driver::new(parameters.frame_interval() * 8);
        (
            Self {
                scene: Scene::new(parameters.clone(), viewport),
                parameters,
                driver,
                controls: Controls::default(),
                running: false,
                exited: false,
            },
            Command::perform(Parameters::load(PARAMETERS_PATH), |result| match result {
                Ok(parameters) => Message::ParametersChanged(parameters),
                Err(err) => {
                    log::warn!("using default parameters: {}", err);
                    Message::ParametersChanged(Parameters::default())
                }
            }),
        )
    }

    fn title(&self) -> String {
        String::from("Backdrop")
    }

    fn subscription(&self) -> Subscription<Message> {
        if !self.running {
            return Subscription::none();
        }

        let events = iced_native::subscription::events().map(Message::Event);
        if self.driver.is_awake() {
            Subscription::batch(vec![
                events,
                time::every(self.parameters.frame_interval()).map(Message::Frame),
            ])
        } else {
            events
        }
    }

    fn update(&mut self, message: Self::Message, _clipboard: &mut Clipboard) -> Command<Message> {
        match message {
            Message::Frame(now) => {
                if self.running {
                    self.frame(now);
                }
            }
            Message::Event(event) => {
                if self.running {
                    self.handle(event);
                }
            }
            Message::Previous => {
                self.scene.navigate(false);
                self.driver.wake();
            }
            Message::Next => {
                self.scene.navigate(true);
                self.driver.wake();
            }
            Message::ToggleTheme => {
                self.toggle_theme();
                self.driver.wake();
            }
            Message::ParametersChanged(parameters) => {
                if self.exited {
                    return Command::none();
                }
                log::info!("starting with {:?} theme", parameters.theme);
                self.start(parameters);
            }
        }
        Command::none()
    }

    fn should_exit(&self) -> bool {
        self.exited
    }

    fn scale_factor(&self) -> f64 {
        self.parameters.scale_factor as f64
    }

    fn view(&mut self) -> Element<Message> {
        let mode = self.scene.mode();
        let theme_label = match mode {
            ThemeMode::Light => "Dark",
            ThemeMode::Dark => "Light",
        };

        let controls = Row::new()
            .spacing(10)
            .height(Length::Units(CONTROLS_HEIGHT))
            .align_items(Align::Center)
            .push(
                Button::new(
                    &mut self.controls.previous_button,
                    iced::widget::Text::new("Previous"),
                )
                .on_press(Message::Previous)
                .style(style::Button(mode)),
            )
            .push(
                Button::new(
                    &mut self.controls.next_button,
                    iced::widget::Text::new("Next"),
                )
                .on_press(Message::Next)
                .style(style::Button(mode)),
            )
            .push(
                Button::new(
                    &mut self.controls.theme_button,
                    iced::widget::Text::new(theme_label),
                )
                .on_press(Message::ToggleTheme)
                .style(style::Button(mode)),
            );

        let content = Column::new()
            .align_items(Align::Center)
            .push(
                Canvas::new(&mut self.scene)
                    .width(Length::Fill)
                    .height(Length::Fill),
            )
            .push(controls);

        Container::new(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(0)
            .style(style::Container(mode))
            .into()
    }
}

fn main() -> iced::Result {
    env_logger::init();

    Backdrop::run(Settings {
        antialiasing: true,
        window: iced::window::Settings {
            size: WINDOW_SIZE,
            ..iced::window::Settings::default()
        },
        ..Settings::default()
    })
}
