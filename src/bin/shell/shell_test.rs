use super::*;
use demo_shell::random::SequenceRandom;

fn shell() -> (Shell<SequenceRandom>, mpsc::UnboundedReceiver<OpenTicket>) {
    let composer = AnswerComposer::new(Arc::new(PresetTable::builtin().unwrap()));
    let (overlay_tx, overlay_rx) = mpsc::unbounded_channel();
    let shell = Shell {
        navigator: Navigator::new(),
        chat: ChatSession::new(composer, SequenceRandom::new(vec![50]), Duration::from_millis(10)),
        overlay_tx,
        overlay_delay: Duration::from_millis(10),
        header_height: 64.0,
    };
    (shell, overlay_rx)
}

// =============================================================================
// parse_command
// =============================================================================

#[test]
fn plain_text_is_a_message() {
    assert_eq!(parse_command("  渠道表格 "), Some(Command::Say("渠道表格".into())));
}

#[test]
fn blank_line_is_ignored() {
    assert_eq!(parse_command("   "), None);
}

#[test]
fn commands_parse_arguments() {
    assert_eq!(parse_command(":tab chat"), Some(Command::Tab("chat".into())));
    assert_eq!(parse_command(":open https://example.com "), Some(Command::Open("https://example.com".into())));
    assert_eq!(parse_command(":ask 3"), Some(Command::Ask(3)));
    assert_eq!(parse_command(":resize 80"), Some(Command::Resize(80.0)));
    assert_eq!(parse_command("#loader2"), Some(Command::Navigate("#loader2".into())));
    assert_eq!(parse_command(":q"), Some(Command::Quit));
}

#[test]
fn bad_arguments_are_unknown() {
    assert_eq!(parse_command(":ask x"), Some(Command::Unknown(":ask x".into())));
    assert_eq!(parse_command(":bogus"), Some(Command::Unknown(":bogus".into())));
}

// =============================================================================
// Shell
// =============================================================================

#[tokio::test]
async fn messages_only_sent_from_chat_tab() {
    let (mut shell, _rx) = shell();
    assert!(shell.apply(Command::Say("你好".into())));
    assert!(shell.chat.transcript().is_empty());

    shell.apply(Command::Tab("chat".into()));
    shell.apply(Command::Say("你好".into()));
    assert!(shell.chat.pending().is_some());
    assert!(shell.chat.transcript().is_typing());
}

#[tokio::test]
async fn ask_submits_preset_question() {
    let (mut shell, _rx) = shell();
    shell.apply(Command::Navigate("#chat".into()));
    shell.apply(Command::Ask(3));
    shell.chat.next_reply().await.unwrap();
    let unit = &shell.chat.transcript().exchanges()[0];
    assert_eq!(unit.user.as_ref().unwrap().text, "查看渠道表现表格");
    assert!(unit.assistant.as_ref().unwrap().table.is_some());
}

#[tokio::test]
async fn ask_out_of_range_does_nothing() {
    let (mut shell, _rx) = shell();
    shell.apply(Command::Tab("chat".into()));
    shell.apply(Command::Ask(0));
    shell.apply(Command::Ask(9));
    assert!(shell.chat.transcript().is_empty());
}

#[tokio::test]
async fn overlay_opens_after_ticket_arrives() {
    let (mut shell, mut rx) = shell();
    shell.apply(Command::Open("https://example.com".into()));
    assert!(shell.navigator.is_loading());

    let ticket = rx.recv().await.unwrap();
    shell.overlay_ready(ticket);
    assert!(shell.navigator.is_overlay_open());
    assert_eq!(shell.navigator.overlay_url(), "https://example.com");

    shell.apply(Command::Escape);
    assert!(!shell.navigator.is_overlay_open());
}

#[tokio::test]
async fn tab_switch_makes_pending_ticket_stale() {
    let (mut shell, mut rx) = shell();
    shell.apply(Command::Open("https://example.com".into()));
    shell.apply(Command::Tab("loader2".into()));

    let ticket = rx.recv().await.unwrap();
    shell.overlay_ready(ticket);
    assert!(!shell.navigator.is_overlay_open());
    assert_eq!(shell.navigator.active_tab(), Tab::Loader2);
}

#[tokio::test]
async fn finish_delivers_reply_still_in_flight() {
    let (mut shell, _rx) = shell();
    shell.apply(Command::Tab("chat".into()));
    shell.apply(Command::Say("渠道表格".into()));
    assert!(shell.chat.pending().is_some());

    shell.finish().await;
    assert!(shell.chat.pending().is_none());
    assert!(!shell.chat.transcript().is_typing());
    assert!(shell.chat.transcript().exchanges()[0].assistant.is_some());
}

#[tokio::test]
async fn finish_without_pending_reply_returns() {
    let (mut shell, _rx) = shell();
    shell.finish().await;
    assert!(shell.chat.transcript().is_empty());
}

#[test]
fn quit_stops_the_loop() {
    let (mut shell, _rx) = shell();
    assert!(!shell.apply(Command::Quit));
}

#[test]
fn render_block_shows_table_and_list() {
    let block = MessageBlock::assistant(demo_shell::answer::ResponseDescriptor {
        table_spec: Some(demo_shell::presets::TableSpec::new(&["a", "b"], &[&["1", "2"]])),
        list_spec: Some(vec!["要点".into()]),
        ..demo_shell::answer::ResponseDescriptor::text("结果：")
    });
    let out = render_block(&block);
    assert!(out.starts_with("助手: 结果："));
    assert!(out.contains("| a | b |"));
    assert!(out.contains("| 1 | 2 |"));
    assert!(out.contains("• 要点"));
}
