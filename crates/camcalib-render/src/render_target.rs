//! Offscreen color + depth targets that viewports render into.

/// Color format of every render target. Sampled by egui as a native texture.
pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
/// Depth format of every render target.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// An offscreen image a viewport is drawn into before being shown in a panel.
pub struct RenderTarget {
    label: String,
    color_texture: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl RenderTarget {
    /// Creates a target. Zero dimensions are clamped to one pixel.
    pub fn new(device: &wgpu::Device, width: u32, height: u32, label: &str) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let (color_texture, color_view, depth_texture, depth_view) =
            Self::create_textures(device, width, height, label);
        Self {
            label: label.to_string(),
            color_texture,
            color_view,
            depth_texture,
            depth_view,
            width,
            height,
        }
    }

    fn create_textures(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        label: &str,
    ) -> (
        wgpu::Texture,
        wgpu::TextureView,
        wgpu::Texture,
        wgpu::TextureView,
    ) {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let color_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{label} color")),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{label} depth")),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        (color_texture, color_view, depth_texture, depth_view)
    }

    /// Resizes the target. Returns true if the textures were recreated, in
    /// which case any texture ids registered with the UI must be refreshed.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) -> bool {
        let width = width.max(1);
        let height = height.max(1);
        if width == self.width && height == self.height {
            return false;
        }

        let (color_texture, color_view, depth_texture, depth_view) =
            Self::create_textures(device, width, height, &self.label);
        self.color_texture = color_texture;
        self.color_view = color_view;
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
        self.width = width;
        self.height = height;
        log::debug!("resized render target '{}' to {width}x{height}", self.label);
        true
    }

    /// Returns (width, height) in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns width / height.
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Returns the color view.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    /// Returns the depth view.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Returns the color texture.
    pub fn texture(&self) -> &wgpu::Texture {
        &self.color_texture
    }

    /// Returns the debug label.
    pub fn label(&self) -> &str {
        &self.label
    }
}
