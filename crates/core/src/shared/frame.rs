use ndarray::{ArrayView3, ArrayViewMut3};

/// A single video/image frame: contiguous pixel bytes in row-major order.
///
/// Color frames are 3-channel RGB; grayscale frames are 1-channel.
/// Format conversion happens at I/O boundaries only.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Single-channel luma copy of this frame, the preprocessing step the
    /// detectors require.
    ///
    /// Uses the integer Rec.601 weights (77, 150, 29) / 256, the same
    /// weighting OpenCV applies in its RGB-to-gray conversion. A frame
    /// that is already single-channel is returned as-is.
    pub fn to_grayscale(&self) -> Frame {
        if self.channels == 1 {
            return self.clone();
        }

        let c = self.channels as usize;
        let mut gray = Vec::with_capacity(self.data.len() / c);
        for px in self.data.chunks_exact(c) {
            let luma =
                (77 * px[0] as u32 + 150 * px[1] as u32 + 29 * px[2] as u32) >> 8;
            gray.push(luma as u8);
        }
        Frame::new(gray, self.width, self.height, 1, self.index)
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
