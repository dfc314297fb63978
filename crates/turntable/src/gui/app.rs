use crate::config::{self, Settings};
use crate::events::AppEvent;
use crate::gui::scene::Scene;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::view;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

pub struct AppModel {
    pub scene: Rc<RefCell<Scene>>,
    /// Frame-clock time of the last tick, relative to the first frame.
    pub clock: Rc<Cell<Duration>>,
    pub size: u32,
    pub root: gtk::ApplicationWindow,
}

#[derive(Debug)]
pub enum AppMsg {
    Start,
    Stop,
    Toggle,
    ConfigReload,
    Quit,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Start => AppMsg::Start,
            AppEvent::Stop => AppMsg::Stop,
            AppEvent::Toggle => AppMsg::Toggle,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Settings, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Turntable"),
            set_resizable: false,
            add_css_class: "turntable-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key {
                        gtk::gdk::Key::space => {
                            sender.input(AppMsg::Toggle);
                            glib::Propagation::Stop
                        }
                        gtk::gdk::Key::Escape => {
                            sender.input(AppMsg::Quit);
                            glib::Propagation::Stop
                        }
                        _ => glib::Propagation::Proceed,
                    }
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                #[watch]
                set_content_width: model.size as i32,
                #[watch]
                set_content_height: model.size as i32,
                add_css_class: "turntable-drawing-area",

                add_controller = gtk::GestureClick {
                    connect_released[sender] => move |_, _, _, _| {
                        sender.input(AppMsg::Toggle);
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (settings, rx) = init;

        theme::load_css();

        let scene = Scene::build(&settings).unwrap_or_else(|e| {
            log::error!("Unusable settings, showing the default disk: {}", e);
            Scene::fallback()
        });
        let size = scene.size();
        let scene = Rc::new(RefCell::new(scene));
        let clock = Rc::new(Cell::new(Duration::ZERO));

        let model = AppModel {
            scene: scene.clone(),
            clock: clock.clone(),
            size,
            root: root.clone(),
        };

        let widgets = view_output!();

        let scene_draw = scene.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = view::draw(cr, &scene_draw.borrow(), &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let scene_tick = scene.clone();
        let first_frame = Cell::new(None::<i64>);
        widgets
            .drawing_area
            .add_tick_callback(move |drawing_area, frame_clock| {
                // microseconds
                let frame_time = frame_clock.frame_time();
                let origin = first_frame.get().unwrap_or(frame_time);
                first_frame.set(Some(origin));

                let now = Duration::from_micros((frame_time - origin).max(0) as u64);
                clock.set(now);
                scene_tick.borrow_mut().frame(now);
                drawing_area.queue_draw();
                glib::ControlFlow::Continue
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        if settings.autostart {
            sender.input(AppMsg::Start);
        }

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        let now = self.clock.get();
        match msg {
            AppMsg::Start => self.scene.borrow_mut().start(now),
            AppMsg::Stop => self.scene.borrow_mut().stop(),
            AppMsg::Toggle => self.scene.borrow_mut().toggle(now),
            AppMsg::ConfigReload => match config::load_settings() {
                Ok(settings) => self.reload(&settings, now),
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::Quit => self.root.close(),
        }
    }
}

impl AppModel {
    /// Swaps in a controller built from `settings`, keeping it running if
    /// the old one was. Notes in flight move over when the layout allows.
    fn reload(&mut self, settings: &Settings, now: Duration) {
        let mut scene = match Scene::build(settings) {
            Ok(scene) => scene,
            Err(e) => {
                log::error!("Failed to rebuild music disk: {}", e);
                return;
            }
        };

        let mut previous = self.scene.borrow_mut();
        if scene.carry_over(&mut previous) {
            log::debug!("Kept {} notes across reload", scene.disk.live_count());
        }
        if previous.disk.is_running() {
            scene.start(now);
        }
        drop(previous);

        self.size = scene.size();
        *self.scene.borrow_mut() = scene;
        log::info!("Configuration reloaded");
    }
}
