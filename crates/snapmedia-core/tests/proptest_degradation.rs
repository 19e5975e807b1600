use proptest::prelude::*;

use snapmedia_core::proto::{ProtoReader, ProtoWriter};
use snapmedia_core::{decode, Decoder, KeyRing, MediaKey, MessageContent};

/// A content root touching every branch kind, with `n` external media.
fn rich_payload(n: usize) -> Vec<u8> {
    let doc = |w: &mut ProtoWriter, d: u64| {
        w.message(5, |p| {
            p.message(1, |a| {
                a.message(1, |m| {
                    m.varint(15, d).message(4, |pair| {
                        pair.string(1, "AAEC").string(2, "AwQ=");
                    });
                });
            });
        });
    };
    let mut w = ProtoWriter::new();
    w.message(3, |list| {
        for i in 0..n {
            list.message(3, |m| doc(m, i as u64));
        }
    })
    .message(4, |s| {
        s.message(1, |c| {
            c.string(1, "snap").string(2, "ref");
        });
        s.message(2, |c| {
            c.message(1, |m| {
                m.varint(13, 5);
            });
        });
    })
    .message(7, |reply| {
        reply.message(17, |m| doc(m, 99));
    })
    .message(11, |m| doc(m, 7))
    .message(14, |a| {
        a.message(2, |b| {
            b.message(2, |t| {
                t.message(3, |s| {
                    s.message(4, |i| {
                        i.bytes(4, &[1, 2]);
                    });
                });
                t.message(13, |g| {
                    g.message(4, |e| {
                        e.message(2, |m| {
                            m.bytes(4, &[3]);
                        });
                    });
                });
            });
        });
    });
    w.finish().to_vec()
}

fn keys(n: usize) -> KeyRing {
    (0..n).map(|i| format!("k{i}")).collect()
}

proptest! {
    #[test]
    fn arbitrary_bytes_never_panic(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode(data.clone());
        let mut ring = keys(4);
        let _ = Decoder::default().decode_content(&ProtoReader::new(data), &mut ring);
    }

    #[test]
    fn truncation_only_removes_descriptors(n in 0usize..4, cut in 0usize..400) {
        let full = rich_payload(n);
        let cut = cut.min(full.len());
        let decoder = Decoder::default();

        let complete = decoder.decode_content(&ProtoReader::new(full.clone()), &mut keys(8));
        let truncated = decoder.decode_content(&ProtoReader::new(full[..cut].to_vec()), &mut keys(8));
        prop_assert!(truncated.len() <= complete.len());
    }

    #[test]
    fn indirect_keys_follow_ring_order_without_reuse(n in 0usize..5, ring_len in 0usize..8) {
        let mut ring = keys(ring_len);
        let out = Decoder::default().decode_content(&ProtoReader::new(rich_payload(n)), &mut ring);

        let ring_keys: Vec<usize> = out
            .iter()
            .filter_map(|a| match &a.key {
                MediaKey::Indirect(k) => k.strip_prefix('k').and_then(|i| i.parse().ok()),
                MediaKey::Direct(_) => None,
            })
            .collect();
        prop_assert!(ring_keys.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(ring_keys.len() <= ring_len);
        prop_assert!(ring_keys.iter().all(|i| *i < ring.cursor()));
    }

    #[test]
    fn decoding_is_idempotent(n in 0usize..4, ring_len in 0usize..8) {
        let payload = rich_payload(n);
        let decoder = Decoder::default();
        let a = decoder.decode_message(&MessageContent::with_key_ring(payload.clone(), keys(ring_len)));
        let b = decoder.decode_message(&MessageContent::with_key_ring(payload, keys(ring_len)));
        prop_assert_eq!(a, b);
    }
}
