use std::thread;
use std::time::Duration;

use assert_cmd::Command;
use integration_tests::DISPLAY_NAME;

fn run_action(action: &str) -> String {
    let output = Command::cargo_bin("worker")
        .unwrap()
        .arg(action)
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap()
}

// Registers a real service, so it needs elevated privileges.
#[test]
#[ignore]
fn test_full_lifecycle() {
    let verb_for = |action: &str| {
        let mut chars = action.chars();
        let first = chars.next().unwrap().to_uppercase();
        format!("{first}{}", chars.as_str())
    };

    for action in ["install", "start", "stop", "uninstall"] {
        let stdout = run_action(action);
        println!("{stdout}");
        assert_eq!(
            format!("{} service [{DISPLAY_NAME}] succeeded", verb_for(action)),
            stdout.trim_end()
        );
        thread::sleep(Duration::from_millis(500));
    }
}
