use crate::engine::math::Mat4;
use crate::engine::math::matrixfuncs::degrees_to_radians;
use crate::engine::model::Model;
use crate::engine::shader::ShaderProgram;

/// Handle to a model inside a [`Scene`], returned by [`Scene::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelId(usize);

/// The draw list: every model the renderer draws each frame.
///
/// Models are owned by value; removing or clearing them drops them, which
/// releases their GPU buffers.
#[derive(Debug, Default)]
pub struct Scene {
    models: Vec<Model>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// A wireframe triangle and an indexed quad in front of a camera at the
    /// origin looking down -Z.
    pub fn demo() -> Self {
        let mut scene = Self::new();

        let triangle = Model::new(
            [0.0, 0.0, degrees_to_radians(15.0)],
            [-0.75, 0.0, -3.0],
            vec![[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.0, 0.5, 0.0]],
        );
        scene.add(triangle);

        let quad = Model::with_indices(
            [degrees_to_radians(30.0), degrees_to_radians(45.0), 0.0],
            [0.75, 0.0, -4.0],
            vec![[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.5, 0.5, 0.0], [-0.5, 0.5, 0.0]],
            vec![0, 1, 2, 2, 3, 0],
        );
        scene.add(quad);

        scene
    }

    pub fn add(&mut self, model: Model) -> ModelId {
        self.models.push(model);
        ModelId(self.models.len() - 1)
    }

    pub fn get(&self, id: ModelId) -> Option<&Model> {
        self.models.get(id.0)
    }

    pub fn get_mut(&mut self, id: ModelId) -> Option<&mut Model> {
        self.models.get_mut(id.0)
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Uploads every model that is not on the GPU yet. Requires a current GL
    /// context.
    pub fn upload_all(&mut self) {
        for model in self.models.iter_mut().filter(|m| !m.is_uploaded()) {
            model.upload();
        }
    }

    /// Draws every model with `shader`, which must already be in use.
    pub fn draw(&self, shader: &ShaderProgram, projection: &Mat4, view: &Mat4) {
        for model in &self.models {
            model.draw(shader, projection, view);
        }
    }

    /// Drops every model, releasing their GPU buffers.
    pub fn clear(&mut self) {
        self.models.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_address_added_models() {
        let mut scene = Scene::new();
        assert!(scene.is_empty());
        let a = scene.add(Model::new([0.0; 3], [1.0, 0.0, 0.0], vec![[0.0; 3]; 3]));
        let b = scene.add(Model::new([0.0; 3], [2.0, 0.0, 0.0], vec![[0.0; 3]; 3]));
        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.get(b).map(Model::position), Some([2.0, 0.0, 0.0]));

        if let Some(model) = scene.get_mut(a) {
            model.set_position([5.0, 0.0, 0.0]);
        }
        assert_eq!(scene.get(a).map(Model::position), Some([5.0, 0.0, 0.0]));
    }

    #[test]
    fn clear_drops_models() {
        let mut scene = Scene::demo();
        assert_eq!(scene.len(), 2);
        scene.clear();
        assert!(scene.is_empty());
        assert!(scene.get(ModelId(0)).is_none());
    }

    #[test]
    fn demo_models_sit_in_front_of_the_camera() {
        let scene = Scene::demo();
        for model in scene.models() {
            assert!(model.position()[2] < -0.1);
            assert!(!model.is_uploaded());
        }
        assert!(scene.models().iter().any(Model::is_indexed));
    }
}
