use std::sync::Arc;

use aes_gcm::{
    Aes256Gcm,
    aead::{Aead, AeadCore, KeyInit, OsRng as AesOsRng},
};
use chacha20poly1305::{ChaCha20Poly1305, aead::OsRng as ChaChaOsRng};
use criterion::{Bencher, Criterion, black_box, criterion_group, criterion_main};
use crypto_module::keypair::KeyPair;
use crypto_module::modes::{ModeKind, ModeOfOperation};
use crypto_module::params::DomainParameters;
use crypto_module::rc6::{KeySize, Rc6, SecretKey};
use rand::RngCore;

const DATA_SIZE_BYTES: usize = 1024;

fn generate_data(size: usize) -> Vec<u8> {
    let mut data = vec![0u8; size];
    rand::rng().fill_bytes(&mut data);
    data
}

fn setup_rc6(kind: ModeKind) -> (ModeOfOperation, Vec<u8>) {
    let key = SecretKey::generate(KeySize::Bits256);
    (ModeOfOperation::new(Rc6::new(&key), kind), generate_data(DATA_SIZE_BYTES))
}

fn bench_rc6_encrypt(kind: ModeKind) -> impl FnMut(&mut Bencher) {
    let (session, data) = setup_rc6(kind);
    move |b| {
        b.iter(|| {
            let _ciphertext = session.encrypt(black_box(&data));
        })
    }
}

fn bench_rc6_decrypt(kind: ModeKind) -> impl FnMut(&mut Bencher) {
    let (session, data) = setup_rc6(kind);
    let ciphertext = session.encrypt(&data);
    move |b| {
        b.iter(|| {
            let plaintext = session.decrypt(black_box(&ciphertext));
            assert_eq!(plaintext, data);
        })
    }
}

fn setup_elgamal() -> (KeyPair, Vec<u8>) {
    let parameters =
        DomainParameters::generate(20).expect("Failed to generate ElGamal parameters");
    let pair = KeyPair::generate(Arc::new(parameters)).expect("Failed to create ElGamal key pair");

    // non-zero payload, the buffer API rejects all-zero input
    let data = vec![0x5au8; DATA_SIZE_BYTES];
    (pair, data)
}

fn bench_elgamal_encrypt(b: &mut Bencher) {
    let (pair, data) = setup_elgamal();

    b.iter(|| {
        let _ciphertext = pair
            .public_key
            .encrypt(black_box(&data))
            .expect("ElGamal encryption failed");
    });
}

fn bench_elgamal_decrypt(b: &mut Bencher) {
    let (pair, data) = setup_elgamal();
    let ciphertext = pair
        .public_key
        .encrypt(&data)
        .expect("ElGamal encryption failed during setup");

    b.iter(|| {
        let _plaintext = pair
            .private_key
            .decrypt(black_box(&ciphertext))
            .expect("ElGamal decryption failed");
    });
}

fn setup_aes() -> (Aes256Gcm, Vec<u8>) {
    let key_bytes = Aes256Gcm::generate_key(AesOsRng);
    let cipher = Aes256Gcm::new(&key_bytes);
    let data = generate_data(DATA_SIZE_BYTES);
    (cipher, data)
}

fn bench_aes_encrypt(b: &mut Bencher) {
    let (cipher, data) = setup_aes();

    b.iter(|| {
        let nonce = Aes256Gcm::generate_nonce(&mut AesOsRng);

        let _ciphertext = cipher
            .encrypt(black_box(&nonce), black_box(data.as_slice()))
            .expect("AES encryption failed");
    });
}

fn bench_aes_decrypt(b: &mut Bencher) {
    let (cipher, data) = setup_aes();

    let nonce = Aes256Gcm::generate_nonce(&mut AesOsRng);
    let ciphertext = cipher
        .encrypt(&nonce, data.as_slice())
        .expect("AES encryption failed during setup");

    b.iter(|| {
        let plaintext = cipher
            .decrypt(black_box(&nonce), black_box(ciphertext.as_slice()))
            .expect("AES decryption failed");

        assert_eq!(plaintext, data);
    });
}

fn setup_chacha() -> (ChaCha20Poly1305, Vec<u8>) {
    let key_bytes = ChaCha20Poly1305::generate_key(&mut ChaChaOsRng);
    let cipher = ChaCha20Poly1305::new(&key_bytes);
    let data = generate_data(DATA_SIZE_BYTES);
    (cipher, data)
}

fn bench_chacha_encrypt(b: &mut Bencher) {
    let (cipher, data) = setup_chacha();
    b.iter(|| {
        let nonce = ChaCha20Poly1305::generate_nonce(&mut ChaChaOsRng);
        let _ciphertext = cipher
            .encrypt(black_box(&nonce), black_box(data.as_slice()))
            .expect("ChaCha20Poly1305 encryption failed");
    });
}

fn bench_chacha_decrypt(b: &mut Bencher) {
    let (cipher, data) = setup_chacha();
    let nonce = ChaCha20Poly1305::generate_nonce(&mut ChaChaOsRng);
    let ciphertext = cipher
        .encrypt(&nonce, data.as_slice())
        .expect("ChaCha20Poly1305 encryption failed during setup");

    b.iter(|| {
        let plaintext = cipher
            .decrypt(black_box(&nonce), black_box(ciphertext.as_slice()))
            .expect("ChaCha20Poly1305 decryption failed");
        assert_eq!(plaintext, data);
    });
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Crypto Comparison");

    group.bench_function("RC6-ECB Encrypt", bench_rc6_encrypt(ModeKind::Ecb));
    group.bench_function("RC6-ECB Decrypt", bench_rc6_decrypt(ModeKind::Ecb));
    group.bench_function("RC6-CBC Encrypt", bench_rc6_encrypt(ModeKind::Cbc));
    group.bench_function("RC6-CBC Decrypt", bench_rc6_decrypt(ModeKind::Cbc));

    group.bench_function("ElGamal Encrypt", bench_elgamal_encrypt);
    group.bench_function("ElGamal Decrypt", bench_elgamal_decrypt);

    group.bench_function("AES-256-GCM Encrypt", bench_aes_encrypt);
    group.bench_function("AES-256-GCM Decrypt", bench_aes_decrypt);

    group.bench_function("ChaCha20Poly1305 Encrypt", bench_chacha_encrypt);
    group.bench_function("ChaCha20Poly1305 Decrypt", bench_chacha_decrypt);

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
