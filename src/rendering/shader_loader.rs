use std::{
    path::{Path, PathBuf},
    sync::{
        mpsc::{self, channel},
        Arc, RwLock,
    },
    time::Duration,
};

use anyhow::Context;
use id_arena::{Arena, Id};
use naga::{
    back::wgsl::WriterFlags,
    valid::{Capabilities, ValidationFlags},
};
use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
};
use notify_debouncer_mini::{
    new_debouncer_opt, notify::*, DebounceEventResult, DebouncedEventKind, Debouncer,
};
use pollster::block_on;
use wgpu::{naga, PollType, RenderPipeline};

const SHARED_MODULES_FOLDER: &str = "shared";

pub(crate) type PipelineFactory = Box<
    dyn Sync
        + Send
        + Fn(&wgpu::Device, &ShaderDefinition, &str) -> anyhow::Result<wgpu::RenderPipeline>,
>;

#[derive(Debug, Clone)]
pub(crate) struct ShaderDefinition {
    pub name: &'static str,
    /// Relative to the shader root.
    pub path: &'static str,
}

pub struct ShaderEntry {
    pipeline_id: PipelineId,
    def: ShaderDefinition,
    factory: PipelineFactory,
}

impl ShaderEntry {
    pub fn new(pipeline_id: PipelineId, def: ShaderDefinition, factory: PipelineFactory) -> Self {
        Self {
            pipeline_id,
            def,
            factory,
        }
    }
}

pub type PipelineId = Id<PipelineCacheEntry>;

#[derive(Default)]
pub struct PipelineCacheEntry(Option<wgpu::RenderPipeline>);

impl PipelineCacheEntry {
    pub fn set_pipeline(&mut self, pipeline: wgpu::RenderPipeline) {
        self.0 = Some(pipeline);
    }
}

pub struct PipelineCacheBuilder {
    shaders: Arena<ShaderEntry>,
    pipelines: Arena<PipelineCacheEntry>,
}

impl PipelineCacheBuilder {
    pub fn new() -> Self {
        Self {
            shaders: Arena::new(),
            pipelines: Arena::new(),
        }
    }

    pub fn add_shader(
        &mut self,
        shader_def: ShaderDefinition,
        factory: PipelineFactory,
    ) -> PipelineId {
        let pipeline_id = self.pipelines.alloc(PipelineCacheEntry::default());
        let shader_entry = ShaderEntry::new(pipeline_id, shader_def, factory);
        self.shaders.alloc(shader_entry);
        pipeline_id
    }

    pub fn build(self) -> PipelineCache {
        PipelineCache {
            shaders: Arc::new(self.shaders),
            pipelines: self.pipelines,
        }
    }
}

pub struct PipelineCache {
    shaders: Arc<Arena<ShaderEntry>>,
    pipelines: Arena<PipelineCacheEntry>,
}

impl PipelineCache {
    /// `None` until the pipeline has compiled once.
    pub fn get(&self, id: PipelineId) -> Option<&RenderPipeline> {
        self.pipelines.get(id).and_then(|entry| entry.0.as_ref())
    }

    pub fn get_entry_mut(&mut self, id: PipelineId) -> Option<&mut PipelineCacheEntry> {
        self.pipelines.get_mut(id)
    }

    pub fn iter_shaders_and_pipelines_mut(
        &mut self,
    ) -> impl Iterator<Item = (&ShaderEntry, &mut PipelineCacheEntry)> {
        // Both arenas are filled together by `add_shader`, so indices line up.
        self.shaders
            .iter()
            .map(|(_, shader_entry)| shader_entry)
            .zip(
                self.pipelines
                    .iter_mut()
                    .map(|(_, pipeline_entry)| pipeline_entry),
            )
    }
}

type Watcher = Debouncer<notify_debouncer_mini::notify::RecommendedWatcher>;

// Compiles all pipelines up front and, when watching, recompiles changed
// shaders on the debouncer thread.
pub(crate) struct ShaderLoader {
    pub cache: PipelineCache,
    device: wgpu::Device,
    shader_root: PathBuf,
    receiver: mpsc::Receiver<(&'static str, PipelineId, wgpu::RenderPipeline)>,
    composer: Arc<RwLock<Composer>>,
    _debouncer: Option<Watcher>,
}

impl ShaderLoader {
    pub fn new(
        device: wgpu::Device,
        cache_builder: PipelineCacheBuilder,
        shader_root: &Path,
        watch: bool,
    ) -> anyhow::Result<Self> {
        let cache = cache_builder.build();
        let shader_root = shader_root.to_path_buf();

        let (send_new_pipelines, recv_new_pipelines) = channel();

        let composer = create_composer(&shader_root.join(SHARED_MODULES_FOLDER))
            .context("Failed to create shader composer")?;
        let composer = Arc::new(RwLock::new(composer));

        let debouncer = if watch {
            Some(watch_shaders(
                device.clone(),
                &shader_root,
                cache.shaders.clone(),
                composer.clone(),
                send_new_pipelines,
            )?)
        } else {
            None
        };

        let mut shader_loader = Self {
            device,
            cache,
            shader_root,
            receiver: recv_new_pipelines,
            composer,
            _debouncer: debouncer,
        };

        shader_loader
            .create_all_pipelines()
            .context("Failed to create all pipelines")?;

        Ok(shader_loader)
    }

    pub(crate) fn create_all_pipelines(&mut self) -> anyhow::Result<()> {
        for (shader, pipeline_entry) in self.cache.iter_shaders_and_pipelines_mut() {
            let pipeline = compile_file(
                &self.device,
                &self.shader_root,
                &shader.def,
                &shader.factory,
                &self.composer,
            )
            .with_context(|| format!("Failed to compile shader: {}", shader.def.name))?;
            pipeline_entry.set_pipeline(pipeline);
        }
        Ok(())
    }

    pub(crate) fn load_pending_shaders(&mut self) {
        while let Ok((name, pipeline_id, pipeline)) = self.receiver.try_recv() {
            if let Some(entry) = self.cache.get_entry_mut(pipeline_id) {
                log::info!("Shader reloaded: {}", name);
                entry.set_pipeline(pipeline);
            }
        }
    }
}

fn watch_shaders(
    device: wgpu::Device,
    shader_root: &Path,
    shaders: Arc<Arena<ShaderEntry>>,
    composer: Arc<RwLock<Composer>>,
    sender: mpsc::Sender<(&'static str, PipelineId, wgpu::RenderPipeline)>,
) -> anyhow::Result<Watcher> {
    let root = shader_root.to_path_buf();

    let mut debouncer = new_debouncer_opt(
        notify_debouncer_mini::Config::default().with_timeout(Duration::from_millis(100)),
        move |res: DebounceEventResult| match res {
            Ok(events) => {
                for event in events {
                    if event.kind != DebouncedEventKind::Any {
                        continue;
                    }

                    let Some(entry) = shaders
                        .iter()
                        .find(|(_, entry)| event.path.ends_with(entry.def.path))
                        .map(|(_, entry)| entry)
                    else {
                        continue;
                    };

                    match compile_file(&device, &root, &entry.def, &entry.factory, &composer) {
                        Ok(pipeline) => {
                            if sender
                                .send((entry.def.name, entry.pipeline_id, pipeline))
                                .is_err()
                            {
                                return;
                            }
                        }
                        Err(e) => log::error!("Failed to reload shader: {:?}", e),
                    }
                }
            }
            Err(e) => log::error!("Error debouncing shader changes: {}", e),
        },
    )
    .context("Failed to create shader watcher")?;

    let absolute_shader_folder = shader_root
        .canonicalize()
        .with_context(|| format!("Shader folder not found: {}", shader_root.display()))?;

    debouncer
        .watcher()
        .watch(&absolute_shader_folder, RecursiveMode::Recursive)
        .context("Failed to watch shader folder")?;

    log::info!("Watching {} for changes", absolute_shader_folder.display());

    Ok(debouncer)
}

/// Resolves imports of the shader at `path` and returns plain WGSL.
pub(crate) fn compose_shader(composer: &mut Composer, path: &Path) -> anyhow::Result<String> {
    let shader_code = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read shader file {}", path.display()))?;

    let file_path = path.to_string_lossy().to_string();

    let module = composer
        .make_naga_module(NagaModuleDescriptor {
            file_path: &file_path,
            source: &shader_code,
            ..Default::default()
        })
        .context("Failed to create Naga module from shader code")?;

    // wgpu validates again when the shader module is created.
    let info = naga::valid::Validator::new(ValidationFlags::empty(), Capabilities::all())
        .validate(&module)
        .context("Failed to validate Naga module")?;

    naga::back::wgsl::write_string(&module, &info, WriterFlags::empty())
        .context("Failed to convert Naga module to WGSL string")
}

fn compile_file(
    device: &wgpu::Device,
    shader_root: &Path,
    shader_def: &ShaderDefinition,
    factory: &PipelineFactory,
    composer: &RwLock<Composer>,
) -> anyhow::Result<wgpu::RenderPipeline> {
    let shader_code = {
        let mut composer = composer
            .write()
            .map_err(|_| anyhow::anyhow!("Shader composer lock poisoned"))?;
        compose_shader(&mut composer, &shader_root.join(shader_def.path))?
    };

    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let pipeline = factory(device, shader_def, &shader_code);

    device
        .poll(PollType::Wait)
        .context("Failed to poll device after shader compilation.")?;

    let error = block_on(device.pop_error_scope());

    if let Some(error) = error {
        return Err(anyhow::anyhow!(
            "Shader compilation failed for {}: {}",
            shader_def.name,
            error
        ));
    };

    pipeline
}

pub(crate) fn create_composer(shared_folder: &Path) -> anyhow::Result<Composer> {
    let shared_files = std::fs::read_dir(shared_folder).with_context(|| {
        format!(
            "Failed to read shared shader modules directory {}",
            shared_folder.display()
        )
    })?;
    let mut composer = Composer::default();

    for entry in shared_files {
        let path = entry
            .context("Failed to read entry in shared shader modules directory")?
            .path();

        if !path.is_file() || path.extension().is_none_or(|ext| ext != "wgsl") {
            continue;
        }

        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read shared shader module {}", path.display()))?;

        let file_path = path.to_string_lossy().to_string();

        composer
            .add_composable_module(ComposableModuleDescriptor {
                source: &source,
                file_path: &file_path,
                language: ShaderLanguage::Wgsl,
                ..Default::default()
            })
            .with_context(|| format!("Failed to add shared shader module: {}", file_path))?;
    }

    Ok(composer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shader_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/shaders")
    }

    #[test]
    fn bundled_shaders_compose() {
        let root = shader_root();
        let mut composer = create_composer(&root.join(SHARED_MODULES_FOLDER)).unwrap();

        let quad = compose_shader(&mut composer, &root.join("quad.wgsl")).unwrap();
        assert!(quad.contains("fn vs_main"));
        assert!(quad.contains("fn fs_main"));

        let model = compose_shader(&mut composer, &root.join("model.wgsl")).unwrap();
        assert!(model.contains("fn vs_main"));
        assert!(model.contains("fn fs_main"));
    }

    #[test]
    fn missing_shader_is_an_error() {
        let root = shader_root();
        let mut composer = create_composer(&root.join(SHARED_MODULES_FOLDER)).unwrap();
        assert!(compose_shader(&mut composer, &root.join("missing.wgsl")).is_err());
    }
}
