use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::bridge;
use crate::config::View;
use crate::error::Result;
use crate::listener::Listener;
use crate::nominal_state::NominalState;
use crate::packet::LastPacket;
use crate::render::{render, Body, Render, Rendered};
use crate::store::SubscriptionId;
use crate::transport::{self, EventSource, Waker};
use eframe::egui::{self, Color32, RichText};
use serde::de::DeserializeOwned;

pub fn run(view: View) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Packet Visualizer",
        options,
        Box::new(move |cc| {
            let waker = repaint_waker(&cc.egui_ctx);
            let app: Box<dyn eframe::App> = match view {
                View::Nominal { endpoint } => {
                    let (trigger, events) = transport::connect(endpoint, waker);
                    Box::new(MyApp::<NominalState, _>::new(
                        Listener::new(events, trigger),
                        "NominalState (Live)",
                    ))
                }
                View::Packets { endpoint } => {
                    let (trigger, source) = bridge::start_listening(endpoint, waker);
                    Box::new(MyApp::<LastPacket, _>::new(
                        Listener::new(source, trigger),
                        "Last Packet",
                    ))
                }
            };
            Ok(app)
        }),
    )?;
    Ok(())
}

fn repaint_waker(ctx: &egui::Context) -> Waker {
    let ctx = ctx.clone();
    Arc::new(move || ctx.request_repaint())
}

struct MyApp<T, S> {
    listener: Listener<T, S>,
    rendered: Rc<RefCell<Rendered>>,
    subscription: SubscriptionId,
    title: &'static str,
}

impl<T, S> MyApp<T, S>
where
    T: DeserializeOwned + Render + 'static,
    S: EventSource,
{
    fn new(mut listener: Listener<T, S>, title: &'static str) -> Self {
        let store = listener.store();
        let rendered = Rc::new(RefCell::new(render(store.current(), store.is_connected())));
        let sink = rendered.clone();
        let subscription = listener
            .store_mut()
            .subscribe(move |value, connected| *sink.borrow_mut() = render(value, connected));

        Self {
            listener,
            rendered,
            subscription,
            title,
        }
    }

    fn sync(&mut self) -> usize {
        self.listener.poll()
    }

    #[cfg(test)]
    fn rendered(&self) -> Rendered {
        self.rendered.borrow().clone()
    }
}

impl<T, S> Drop for MyApp<T, S> {
    fn drop(&mut self) {
        self.listener.store_mut().unsubscribe(self.subscription);
        self.listener.close();
    }
}

impl<T, S> eframe::App for MyApp<T, S>
where
    T: DeserializeOwned + Render + 'static,
    S: EventSource,
{
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync();
        let rendered = self.rendered.borrow();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Packet Visualizer");
            ui.horizontal(|ui| {
                ui.label(RichText::new("WebSocket Status:").strong());
                let color = if rendered.connected {
                    Color32::GREEN
                } else {
                    Color32::RED
                };
                ui.colored_label(color, rendered.status_text());
            });
            ui.separator();

            match &rendered.body {
                Body::Empty => {}
                Body::Fields(fields) => {
                    ui.heading(self.title);
                    egui::Grid::new("fields")
                        .num_columns(2)
                        .striped(true)
                        .show(ui, |ui| {
                            for field in fields {
                                ui.label(RichText::new(format!("{}:", field.label)).strong());
                                ui.monospace(&field.text);
                                ui.end_row();
                            }
                        });
                }
                Body::Dump(text) => {
                    ui.heading(self.title);
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        ui.monospace(text);
                    });
                }
            }
        });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::nominal_state::test::EXAMPLE;
    use crate::render::Field;
    use crate::transport::{Event, Payload};
    use std::sync::mpsc::channel;
    use stream_cancel::Tripwire;

    #[test]
    fn renders_on_every_store_change() {
        let (tx, rx) = channel();
        let (trigger, _tripwire) = Tripwire::new();
        let mut app = MyApp::<NominalState, _>::new(Listener::new(rx, trigger), "state");

        assert_eq!(app.rendered(), Rendered::default());

        tx.send(Event::Open).unwrap();
        app.sync();
        assert!(app.rendered().connected);
        assert_eq!(app.rendered().body, Body::Empty);

        tx.send(Event::Message(Payload::Text(EXAMPLE.to_string()))).unwrap();
        app.sync();
        let Body::Fields(fields) = app.rendered().body else {
            panic!("expected fields");
        };
        assert_eq!(
            fields[0],
            Field {
                label: "Position",
                text: "x=1.0000, y=2.0000, z=3.0000".to_string()
            }
        );

        tx.send(Event::Close).unwrap();
        app.sync();
        assert_eq!(app.rendered().status_text(), "Disconnected");
        assert!(matches!(app.rendered().body, Body::Fields(_)));
    }

    #[test]
    fn repeated_payload_renders_identically() {
        let (tx, rx) = channel();
        let (trigger, _tripwire) = Tripwire::new();
        let mut app = MyApp::<NominalState, _>::new(Listener::new(rx, trigger), "state");

        tx.send(Event::Open).unwrap();
        tx.send(Event::Message(Payload::Text(EXAMPLE.to_string()))).unwrap();
        app.sync();
        let first = app.rendered();

        tx.send(Event::Message(Payload::Text(EXAMPLE.to_string()))).unwrap();
        assert_eq!(app.sync(), 1);
        assert_eq!(app.rendered(), first);
    }

    #[test]
    fn packet_view_dumps_json() {
        let (tx, rx) = channel();
        let (trigger, _tripwire) = Tripwire::new();
        let mut app = MyApp::<LastPacket, _>::new(Listener::new(rx, trigger), "packet");

        tx.send(Event::Message(Payload::Json(
            serde_json::json!({"packet": {"seq": 7}}),
        )))
        .unwrap();
        app.sync();

        assert_eq!(
            app.rendered().body,
            Body::Dump("{\n  \"seq\": 7\n}".to_string())
        );
    }
}
