#[cfg(test)]
mod tests {
	use std::io::Write;
	use std::sync::Arc;
	use std::thread;

	use chatgen_core::error::StoreError;
	use chatgen_core::store::message::{Chat, MessageEntity, User};
	use chatgen_core::store::{MessageStore, StoredMessage};

	fn msg(text: &str) -> StoredMessage {
		StoredMessage {
			text: text.to_owned(),
			..StoredMessage::default()
		}
	}

	#[test]
	fn test_append_assigns_increasing_ids_and_scan_returns_them() {
		let dir = tempfile::tempdir().unwrap();
		let store = MessageStore::open(dir.path().join("history.log")).unwrap();

		// 1. Ids start at 1 and increase by one per append
		assert_eq!(store.append(&msg("раз")).unwrap(), 1);
		assert_eq!(store.append(&msg("два")).unwrap(), 2);
		assert_eq!(store.append(&msg("три")).unwrap(), 3);
		assert_eq!(store.len(), 3);

		// 2. Scan returns exactly the appended records, in order
		let records: Vec<_> = store.scan().unwrap().map(|r| r.unwrap()).collect();
		let ids: Vec<u64> = records.iter().map(|(seq, _)| *seq).collect();
		let texts: Vec<&str> = records.iter().map(|(_, m)| m.text.as_str()).collect();
		assert_eq!(ids, [1, 2, 3]);
		assert_eq!(texts, ["раз", "два", "три"]);
	}

	#[test]
	fn test_round_trip_preserves_every_field() {
		let dir = tempfile::tempdir().unwrap();
		let store = MessageStore::open(dir.path().join("history.log")).unwrap();

		let original = StoredMessage {
			message_id: 42,
			from: User {
				id: 7,
				first_name: "Игнат".to_owned(),
				last_name: "Петров".to_owned(),
				username: "ignat".to_owned(),
				language_code: "ru".to_owned(),
			},
			date: 1_700_000_000,
			chat: Chat {
				id: -1_001_234,
				kind: "group".to_owned(),
				title: "Болтовня".to_owned(),
				username: String::new(),
				first_name: String::new(),
				last_name: String::new(),
				all_admins: true,
			},
			text: "привет, мир!".to_owned(),
			entities: vec![MessageEntity {
				kind: "mention".to_owned(),
				offset: 0,
				length: 6,
				url: String::new(),
				user: None,
			}],
		};

		store.append(&original).unwrap();

		let (seq, stored) = store.scan().unwrap().next().unwrap().unwrap();
		assert_eq!(seq, 1);
		assert_eq!(stored, original);
	}

	#[test]
	fn test_concurrent_appends_never_share_an_id() {
		let dir = tempfile::tempdir().unwrap();
		let store = Arc::new(MessageStore::open(dir.path().join("history.log")).unwrap());

		let mut handles = Vec::new();
		for worker in 0..8 {
			let store = store.clone();
			handles.push(thread::spawn(move || {
				let mut ids = Vec::new();
				for i in 0..25 {
					let text = format!("сообщение {worker} {i}");
					ids.push(store.append(&msg(&text)).unwrap());
				}
				ids
			}));
		}

		let mut ids: Vec<u64> = handles
			.into_iter()
			.flat_map(|h| h.join().unwrap())
			.collect();
		ids.sort_unstable();

		// Every id handed out exactly once, no gaps
		assert_eq!(ids, (1..=200).collect::<Vec<u64>>());
		assert_eq!(store.scan().unwrap().count(), 200);
	}

	#[test]
	fn test_reopen_resumes_the_sequence() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("history.log");

		{
			let store = MessageStore::open(&path).unwrap();
			store.append(&msg("раз")).unwrap();
			store.append(&msg("два")).unwrap();
		}

		let store = MessageStore::open(&path).unwrap();
		assert_eq!(store.len(), 2);
		assert_eq!(store.append(&msg("три")).unwrap(), 3);

		let texts: Vec<String> = store
			.scan()
			.unwrap()
			.map(|r| r.unwrap().1.text)
			.collect();
		assert_eq!(texts, ["раз", "два", "три"]);
	}

	#[test]
	fn test_scan_is_a_snapshot() {
		let dir = tempfile::tempdir().unwrap();
		let store = MessageStore::open(dir.path().join("history.log")).unwrap();
		store.append(&msg("раз")).unwrap();

		// A scan opened now must not see what lands afterward
		let scan = store.scan().unwrap();
		store.append(&msg("два")).unwrap();

		assert_eq!(scan.count(), 1);
		assert_eq!(store.scan().unwrap().count(), 2);
	}

	#[test]
	fn test_scans_are_independent_traversals() {
		let dir = tempfile::tempdir().unwrap();
		let store = MessageStore::open(dir.path().join("history.log")).unwrap();
		store.append(&msg("раз")).unwrap();
		store.append(&msg("два")).unwrap();

		let mut first = store.scan().unwrap();
		let mut second = store.scan().unwrap();

		// Advancing one traversal leaves the other at the beginning
		assert_eq!(first.next().unwrap().unwrap().0, 1);
		assert_eq!(first.next().unwrap().unwrap().0, 2);
		assert_eq!(second.next().unwrap().unwrap().0, 1);
	}

	#[test]
	fn test_damaged_framing_is_fatal_at_open() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("history.log");

		// 1. A file shorter than one frame header
		std::fs::write(&path, b"junk").unwrap();
		assert!(matches!(
			MessageStore::open(&path),
			Err(StoreError::Unavailable(_))
		));

		// 2. A well-formed frame with the wrong starting sequence id
		let mut frame = Vec::new();
		frame.extend_from_slice(&5u64.to_be_bytes());
		frame.extend_from_slice(&1u32.to_be_bytes());
		frame.push(0);
		std::fs::write(&path, &frame).unwrap();
		assert!(matches!(
			MessageStore::open(&path),
			Err(StoreError::Unavailable(_))
		));
	}

	#[test]
	fn test_malformed_payload_surfaces_from_scan() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("history.log");

		// A frame whose header is fine but whose payload is not a message
		let mut file = std::fs::File::create(&path).unwrap();
		file.write_all(&1u64.to_be_bytes()).unwrap();
		file.write_all(&1u32.to_be_bytes()).unwrap();
		file.write_all(&[0xFF]).unwrap();
		drop(file);

		// Framing replay passes, so the store opens
		let store = MessageStore::open(&path).unwrap();

		let mut scan = store.scan().unwrap();
		assert!(matches!(
			scan.next(),
			Some(Err(StoreError::MalformedRecord { seq: 1, .. }))
		));
		// The traversal ends instead of skipping past the damage
		assert!(scan.next().is_none());
	}
}
