//! ECS-to-widget-tree synchronization system

use super::{UiCoordinateSystem, UiTree};
use crate::ecs::components::UiComponent;
use crate::ecs::{EntityManager, System};
use crate::engine::EngineResult;
use crate::input::{InputService, MouseButton};
use crate::render::RenderDevice;
use std::any::TypeId;
use std::cell::RefCell;
use std::rc::Rc;

/// Bridges declarative UI placement in the ECS to the retained widget tree
///
/// Each update: resolves every [`UiComponent`]'s logical rect into screen
/// pixels, pushes it into the tree, forwards cursor and primary-button
/// transitions for hover/press handling, then ticks the widgets. The render
/// pass draws the tree as an overlay.
pub struct UiSystem {
    coords: UiCoordinateSystem,
    tree: Rc<RefCell<UiTree>>,
    input: Rc<RefCell<InputService>>,
    device: Rc<RefCell<dyn RenderDevice>>,
    mouse_was_down: bool,
}

impl UiSystem {
    /// Create the UI system for an initial viewport size
    pub fn new(
        tree: Rc<RefCell<UiTree>>,
        input: Rc<RefCell<InputService>>,
        device: Rc<RefCell<dyn RenderDevice>>,
        viewport_width: f32,
        viewport_height: f32,
    ) -> Self {
        Self {
            coords: UiCoordinateSystem::new(viewport_width, viewport_height),
            tree,
            input,
            device,
            mouse_was_down: false,
        }
    }

    /// Propagate a viewport resize into coordinate resolution
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.coords.set_viewport_size(width, height);
    }

    /// The coordinate system used for unit resolution
    pub fn coords(&self) -> &UiCoordinateSystem {
        &self.coords
    }
}

impl System for UiSystem {
    fn name(&self) -> &'static str {
        "ui"
    }

    fn update(&mut self, entities: &mut EntityManager, dt: f32) -> EngineResult<()> {
        let tree = Rc::clone(&self.tree);
        let mut tree = tree.borrow_mut();

        // Sync declarative placement into the tree
        for entity in entities.query_entities(&[TypeId::of::<UiComponent>()]) {
            let Some(component) = entities.try_get_component::<UiComponent>(entity) else {
                continue;
            };
            let Some(element) = tree.element_mut(component.element) else {
                log::warn!("{} references a UI element that is not in the tree", entity);
                continue;
            };
            let rect = self.coords.resolve_rect(
                component.position,
                component.size,
                component.position_unit,
                component.size_unit,
                component.anchor,
            );
            element.set_rect(rect);
            element.set_visible(component.visible);
        }

        // Forward input transitions, then tick the widgets
        let (cursor, mouse_down) = {
            let input = self.input.borrow();
            (
                input.cursor_position(),
                input.is_mouse_button_down(MouseButton::Left),
            )
        };
        tree.for_each_mut(|element| element.handle_cursor(cursor.0, cursor.1));
        if mouse_down != self.mouse_was_down {
            self.mouse_was_down = mouse_down;
            tree.for_each_mut(|element| element.handle_mouse_button(mouse_down, cursor.0, cursor.1));
        }
        tree.for_each_mut(|element| element.update(dt));
        Ok(())
    }

    fn render(&mut self, _entities: &mut EntityManager) -> EngineResult<()> {
        let device = Rc::clone(&self.device);
        let mut device = device.borrow_mut();
        self.tree.borrow().draw(&mut *device)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::render::{HeadlessDevice, RenderCommand, ScreenRect};
    use crate::ui::{Anchor, CoordinateUnit, UiButton, UiState};

    struct Fixture {
        entities: EntityManager,
        tree: Rc<RefCell<UiTree>>,
        input: Rc<RefCell<InputService>>,
        device: Rc<RefCell<HeadlessDevice>>,
        system: UiSystem,
    }

    fn fixture() -> Fixture {
        let tree = Rc::new(RefCell::new(UiTree::new()));
        let input = Rc::new(RefCell::new(InputService::new()));
        let device = Rc::new(RefCell::new(HeadlessDevice::new()));
        let erased: Rc<RefCell<dyn RenderDevice>> = device.clone();
        let system = UiSystem::new(tree.clone(), input.clone(), erased, 800.0, 600.0);
        Fixture {
            entities: EntityManager::new(),
            tree,
            input,
            device,
            system,
        }
    }

    fn add_button(
        fixture: &mut Fixture,
        make: impl Fn(crate::ui::UiElementId) -> UiComponent,
    ) -> crate::ui::UiElementId {
        let element = fixture
            .tree
            .borrow_mut()
            .insert(Box::new(UiButton::with_text("hi")));
        let entity = fixture.entities.create_entity();
        fixture.entities.add_component(entity, make(element)).unwrap();
        element
    }

    #[test]
    fn sync_writes_resolved_rect_into_tree() {
        let mut fixture = fixture();
        let element = add_button(&mut fixture, |element| UiComponent {
            element,
            position: Vec2::new(50.0, 50.0),
            size: Vec2::new(25.0, 10.0),
            position_unit: CoordinateUnit::Percentage,
            size_unit: CoordinateUnit::Percentage,
            anchor: Anchor::TopLeft,
            visible: true,
        });

        fixture.system.update(&mut fixture.entities, 0.016).unwrap();

        let tree = fixture.tree.borrow();
        let rect = tree.element(element).unwrap().rect();
        assert_eq!(rect, ScreenRect::new(400.0, 300.0, 200.0, 60.0));
    }

    #[test]
    fn hover_and_press_flow_through_sync() {
        let mut fixture = fixture();
        let element = add_button(&mut fixture, |element| {
            UiComponent::pixels(element, Vec2::new(100.0, 100.0), Vec2::new(200.0, 50.0))
        });

        fixture.input.borrow_mut().move_cursor(150.0, 120.0);
        fixture.system.update(&mut fixture.entities, 0.016).unwrap();
        assert_eq!(
            fixture.tree.borrow().element(element).unwrap().state(),
            UiState::Hover
        );

        fixture.input.borrow_mut().press_button(MouseButton::Left);
        fixture.system.update(&mut fixture.entities, 0.016).unwrap();
        assert_eq!(
            fixture.tree.borrow().element(element).unwrap().state(),
            UiState::Pressed
        );

        fixture.input.borrow_mut().release_button(MouseButton::Left);
        fixture.system.update(&mut fixture.entities, 0.016).unwrap();
        assert_eq!(
            fixture.tree.borrow().element(element).unwrap().state(),
            UiState::Hover
        );
    }

    #[test]
    fn render_draws_visible_elements() {
        let mut fixture = fixture();
        add_button(&mut fixture, |element| {
            UiComponent::pixels(element, Vec2::new(10.0, 10.0), Vec2::new(100.0, 40.0))
        });

        fixture.system.update(&mut fixture.entities, 0.016).unwrap();
        fixture.system.render(&mut fixture.entities).unwrap();

        let device = fixture.device.borrow();
        let rects: Vec<ScreenRect> = device
            .commands()
            .iter()
            .filter_map(|command| match command {
                RenderCommand::DrawRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect();
        // Button background plus its label placeholder
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0], ScreenRect::new(10.0, 10.0, 100.0, 40.0));
    }

    #[test]
    fn hidden_components_hide_their_elements() {
        let mut fixture = fixture();
        add_button(&mut fixture, |element| {
            let mut component =
                UiComponent::pixels(element, Vec2::new(10.0, 10.0), Vec2::new(100.0, 40.0));
            component.visible = false;
            component
        });

        fixture.system.update(&mut fixture.entities, 0.016).unwrap();
        fixture.system.render(&mut fixture.entities).unwrap();

        assert_eq!(fixture.device.borrow().draw_call_count(), 0);
    }

    #[test]
    fn resize_rescales_percentage_layouts() {
        let mut fixture = fixture();
        assert_eq!(
            fixture.system.coords().to_screen(Vec2::new(50.0, 50.0), CoordinateUnit::Percentage),
            Vec2::new(400.0, 300.0)
        );
        fixture.system.set_viewport_size(1000.0, 500.0);
        assert_eq!(
            fixture.system.coords().to_screen(Vec2::new(50.0, 50.0), CoordinateUnit::Percentage),
            Vec2::new(500.0, 250.0)
        );
    }
}
