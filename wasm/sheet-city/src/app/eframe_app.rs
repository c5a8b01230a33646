use std::{cell::RefCell, rc::Rc};

use egui::Context;

use crate::app::CityView;
use crate::scene::{Scene, SceneEvent};

pub struct SheetCityApp {
    scene: Rc<RefCell<Scene>>,
    view: CityView,
}

impl SheetCityApp {
    pub fn new(scene: Rc<RefCell<Scene>>) -> Self {
        let view = CityView::new(&scene.borrow());
        Self { scene, view }
    }
}

impl eframe::App for SheetCityApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        // Time.
        let dt_s = {
            let dt = ctx.input(|i| i.unstable_dt);
            if dt.is_finite() && dt > 0.0 { dt } else { 1.0 / 60.0 }
        };

        let mut scene = self.scene.borrow_mut();
        if scene.is_torn_down() {
            return;
        }
        scene.handle(SceneEvent::Tick { dt_s: dt_s as f64 });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.view.show(ui, &mut scene));

        // Keep animating.
        ctx.request_repaint();
    }
}
