//! In-memory device used by unit tests

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use ash::vk::{self, Handle};

use crate::device::RenderDevice;

/// The five SPIR-V header words plus one zero word
pub const VALID_SPIRV_WORDS: [u32; 6] = [0x0723_0203, 0x0001_0000, 0, 1, 0, 0];

/// Bytes of a minimal SPIR-V blob that passes header validation
pub fn spirv_bytes() -> Vec<u8> {
    bytemuck::cast_slice::<u32, u8>(&VALID_SPIRV_WORDS).to_vec()
}

#[derive(Debug, Default)]
struct MockState {
    next_handle: u64,
    shader_modules: BTreeSet<u64>,
    pipeline_layouts: BTreeSet<u64>,
    pipelines: BTreeSet<u64>,
    pipeline_batches: Vec<usize>,
    shader_module_failure: Option<vk::Result>,
    pipeline_failure: Option<vk::Result>,
    pipeline_shortfall: usize,
}

impl MockState {
    fn allocate(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

/// Device that hands out unique fake handles and tracks what is still alive
#[derive(Debug, Clone, Default)]
pub struct MockDevice {
    state: Rc<RefCell<MockState>>,
}

impl MockDevice {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self::default()
    }

    /// Make every following shader module creation fail with `result`
    pub fn fail_shader_modules(&self, result: vk::Result) {
        self.state.borrow_mut().shader_module_failure = Some(result);
    }

    /// Make every following pipeline batch fail with `result`
    pub fn fail_pipelines(&self, result: vk::Result) {
        self.state.borrow_mut().pipeline_failure = Some(result);
    }

    /// Make every following pipeline batch return this many handles too few
    pub fn drop_trailing_pipelines(&self, count: usize) {
        self.state.borrow_mut().pipeline_shortfall = count;
    }

    pub fn live_shader_modules(&self) -> usize {
        self.state.borrow().shader_modules.len()
    }

    pub fn live_pipeline_layouts(&self) -> usize {
        self.state.borrow().pipeline_layouts.len()
    }

    pub fn live_pipelines(&self) -> usize {
        self.state.borrow().pipelines.len()
    }

    /// Sizes of every batch passed to `create_graphics_pipelines`
    pub fn pipeline_batches(&self) -> Vec<usize> {
        self.state.borrow().pipeline_batches.clone()
    }
}

impl RenderDevice for MockDevice {
    fn create_shader_module(&self, code: &[u32]) -> Result<vk::ShaderModule, vk::Result> {
        let mut state = self.state.borrow_mut();
        if let Some(result) = state.shader_module_failure {
            return Err(result);
        }
        assert!(!code.is_empty());
        let raw = state.allocate();
        state.shader_modules.insert(raw);
        Ok(vk::ShaderModule::from_raw(raw))
    }

    fn destroy_shader_module(&self, module: vk::ShaderModule) {
        assert!(self.state.borrow_mut().shader_modules.remove(&module.as_raw()));
    }

    fn create_pipeline_layout(&self, _create_info: &vk::PipelineLayoutCreateInfo) -> Result<vk::PipelineLayout, vk::Result> {
        let mut state = self.state.borrow_mut();
        let raw = state.allocate();
        state.pipeline_layouts.insert(raw);
        Ok(vk::PipelineLayout::from_raw(raw))
    }

    fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout) {
        assert!(self.state.borrow_mut().pipeline_layouts.remove(&layout.as_raw()));
    }

    fn create_graphics_pipelines(
        &self,
        _cache: vk::PipelineCache,
        create_infos: &[vk::GraphicsPipelineCreateInfo],
    ) -> Result<Vec<vk::Pipeline>, vk::Result> {
        let mut state = self.state.borrow_mut();
        state.pipeline_batches.push(create_infos.len());
        if let Some(result) = state.pipeline_failure {
            return Err(result);
        }
        let count = create_infos.len().saturating_sub(state.pipeline_shortfall);
        Ok((0..count)
            .map(|_| {
                let raw = state.allocate();
                state.pipelines.insert(raw);
                vk::Pipeline::from_raw(raw)
            })
            .collect())
    }

    fn destroy_pipeline(&self, pipeline: vk::Pipeline) {
        assert!(self.state.borrow_mut().pipelines.remove(&pipeline.as_raw()));
    }
}
