use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, ComposerError, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};
use std::borrow::Cow;

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Pre-loads the shared WGSL modules at construction time. Consuming shaders
/// use `#import cloud::module_name` to pull in shared code. The composer
/// produces `naga::Module` IR directly, skipping WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition.
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Shared modules in dependency order.
const MODULES: &[ModuleDef] = &[
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/camera.wgsl"),
        file_path: "modules/camera.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/point_sprite.wgsl"),
        file_path: "modules/point_sprite.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/pick_code.wgsl"),
        file_path: "modules/pick_code.wgsl",
    },
];

/// Visible and highlight point shader.
pub const POINT_CLOUD_SHADER: (&str, &str) = (
    include_str!("../../assets/shaders/points/point_cloud.wgsl"),
    "points/point_cloud.wgsl",
);

/// Color-coded picking shader.
pub const PICKING_SHADER: (&str, &str) = (
    include_str!("../../assets/shaders/points/picking_points.wgsl"),
    "points/picking_points.wgsl",
);

impl ShaderComposer {
    /// Composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// Returns the composer error of the first module that fails to parse.
    pub fn new() -> Result<Self, Box<ComposerError>> {
        let mut composer = Composer::default();

        for m in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(Box::new)?;
        }

        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import`
    /// directives) into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns the composer error if imports cannot be resolved or the
    /// source does not validate.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        (source, file_path): (&str, &str),
    ) -> Result<wgpu::ShaderModule, Box<ComposerError>> {
        let naga_module = self.compose_naga(source, file_path)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without creating a
    /// wgpu shader module. Useful for testing composition without a device.
    ///
    /// # Errors
    ///
    /// Returns the composer error if imports cannot be resolved.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, Box<ComposerError>> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(Box::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for (source, file_path) in [POINT_CLOUD_SHADER, PICKING_SHADER] {
            let module = composer
                .compose_naga(source, file_path)
                .unwrap_or_else(|e| {
                    panic!("Shader '{file_path}' failed to compose: {e}")
                });
            assert!(
                module
                    .entry_points
                    .iter()
                    .any(|ep| ep.name == "fs_main"),
                "{file_path} has no fs_main"
            );
        }
    }

    #[test]
    fn point_shader_has_highlight_entry() {
        let mut composer = ShaderComposer::new().unwrap();
        let (source, file_path) = POINT_CLOUD_SHADER;
        let module = composer.compose_naga(source, file_path).unwrap();
        let names: Vec<_> =
            module.entry_points.iter().map(|ep| ep.name.as_str()).collect();
        assert!(names.contains(&"vs_main"));
        assert!(names.contains(&"vs_picked"));
    }
}
