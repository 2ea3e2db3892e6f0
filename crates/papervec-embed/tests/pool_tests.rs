use candle_core::{DType, Device, Tensor};
use papervec_embed::{l2_normalize, masked_mean};

#[test]
fn masked_mean_ignores_padded_positions() {
    let dev = Device::Cpu;
    // Two tokens with hidden dim 4; second token is masked out.
    let h = Tensor::from_slice(
        &[
            1.0f32, 2.0, 3.0, 4.0, // token 0
            5.0, 6.0, 7.0, 8.0, // token 1 (padding)
        ],
        (1, 2, 4),
        &dev,
    )
    .unwrap();
    let mask = Tensor::from_slice(&[1i64, 0i64], (1, 2), &dev)
        .unwrap()
        .to_dtype(DType::F32)
        .unwrap();
    let out = masked_mean(&h, &mask).unwrap();
    let v: Vec<Vec<f32>> = out.to_vec2().unwrap();
    let v = &v[0];
    // Mean over unmasked tokens = first token [1,2,3,4]
    for (a, b) in v.iter().cloned().zip([1.0f32, 2.0, 3.0, 4.0]) {
        assert!((a - b).abs() < 1e-5, "a={} b={}", a, b);
    }
}

#[test]
fn masked_mean_averages_all_unmasked_tokens() {
    let dev = Device::Cpu;
    let h = Tensor::from_slice(
        &[1.0f32, 3.0, 3.0, 5.0], // two tokens, hidden dim 2
        (1, 2, 2),
        &dev,
    )
    .unwrap();
    let mask = Tensor::from_slice(&[1.0f32, 1.0], (1, 2), &dev).unwrap();
    let out = masked_mean(&h, &mask).unwrap();
    let v: Vec<Vec<f32>> = out.to_vec2().unwrap();
    assert!((v[0][0] - 2.0).abs() < 1e-5);
    assert!((v[0][1] - 4.0).abs() < 1e-5);
}

#[test]
fn l2_normalize_yields_unit_rows() {
    let dev = Device::Cpu;
    let e = Tensor::from_slice(&[3.0f32, 4.0], (1, 2), &dev).unwrap();
    let out = l2_normalize(&e).unwrap();
    let v: Vec<Vec<f32>> = out.to_vec2().unwrap();
    assert!((v[0][0] - 0.6).abs() < 1e-5);
    assert!((v[0][1] - 0.8).abs() < 1e-5);

    let norm: f32 = v[0].iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5);
}
