//! Kiểm thử xuyên suốt: văn bản thô → phân tích → rút theo ma trận →
//! sinh đề kèm bảng đáp án.

use rand::rngs::StdRng;
use rand::SeedableRng;

use exam_paper_engine::{
    BloomLevel, CorrectLetter, ExamFlow, ExamMatrix, GeneratedPaper, GeneratorService,
    ParserService, QuestionKind, SelectorService,
};

/// Đối chiếu bảng đáp án với đề: phương án tại chữ cái công bố,
/// sau khi gỡ tiền tố và chuẩn hóa, phải trùng nội dung đáp án
fn assert_key_matches_paper(paper: &GeneratedPaper) {
    for (position, entry) in &paper.answer_key {
        let CorrectLetter::Letter(letter) = entry.correct_letter else {
            continue;
        };
        let question = &paper.ordered_questions[position - 1];
        let index = (letter as u8 - b'A') as usize;
        let option = &question.options[index];
        let text = option.splitn(2, ". ").nth(1).unwrap_or(option);
        assert_eq!(normalize(text), normalize(&entry.correct_content));
    }
}

fn normalize(text: &str) -> String {
    text.to_lowercase().split_whitespace().collect()
}

const RAW_EXAM: &str = "\
ĐỀ KIỂM TRA GIỮA KỲ - MÔN ĐỊA LÝ

Câu 1. Thủ đô của Việt Nam là thành phố nào?
A. Huế
B. Đà Nẵng
C. Hà Nội
D. Cần Thơ

Câu 2. Sông nào dài nhất Việt Nam?
A. Sông Hồng
B. Sông Đồng Nai
C. Sông Mã
D. Sông Cửu Long

Câu 3. Trình bày đặc điểm khí hậu miền Bắc.
Hướng dẫn giải:
Khí hậu nhiệt đới ẩm gió mùa, có mùa đông lạnh.

BẢNG ĐÁP ÁN
1C 2B
";

#[test]
fn test_pipeline_parse_then_generate() {
    let parser = ParserService::new();
    let records = parser.parse(RAW_EXAM);

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].kind, QuestionKind::MultipleChoice);
    assert_eq!(records[0].correct_answer, "C");
    assert_eq!(records[1].correct_answer, "B");
    assert_eq!(records[2].kind, QuestionKind::Essay);

    let mut rng = StdRng::seed_from_u64(2024);
    let paper = GeneratorService::new()
        .generate(&records, records.len(), "GK-101", &mut rng)
        .unwrap();

    assert_eq!(paper.ordered_questions.len(), 3);
    assert_eq!(paper.answer_key.len(), 3);
    assert_key_matches_paper(&paper);

    // Câu tự luận mang nhãn "Tự luận" và giữ lời giải trong bảng đáp án
    let essay_entry = paper
        .answer_key
        .values()
        .find(|e| e.correct_letter == CorrectLetter::Essay)
        .expect("phải có một câu tự luận");
    assert!(essay_entry.explanation.contains("gió mùa"));
}

#[test]
fn test_side_table_answers_survive_shuffle() {
    // Đáp án lấy từ bảng cuối tài liệu phải trỏ đúng nội dung
    // phương án sau mọi lần xáo trộn
    let parser = ParserService::new();
    let records = parser.parse(RAW_EXAM);

    for seed in 0..30 {
        let mut rng = StdRng::seed_from_u64(seed);
        let paper = GeneratorService::new()
            .generate(&records, 2, "GK-102", &mut rng)
            .unwrap();

        for entry in paper.answer_key.values() {
            if entry.correct_letter == CorrectLetter::Essay {
                continue;
            }
            assert!(
                entry.correct_letter.is_gradable(),
                "seed {} sinh ra đáp án không quy giải được",
                seed
            );
        }
        assert_key_matches_paper(&paper);
    }
}

#[test]
fn test_two_generations_differ_but_both_valid() {
    let pool: Vec<_> = (1..=5)
        .map(|i| {
            let mut q = exam_paper_engine::QuestionRecord {
                id: format!("q{}", i),
                content: format!("Câu hỏi số {}?", i),
                kind: QuestionKind::MultipleChoice,
                options: vec![
                    "A. Một".to_string(),
                    "B. Hai".to_string(),
                    "C. Ba".to_string(),
                    "D. Bốn".to_string(),
                ],
                ..Default::default()
            };
            q.correct_answer = "A. Một".to_string();
            q
        })
        .collect();

    let generator = GeneratorService::new();
    let mut orders = std::collections::HashSet::new();
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let paper = generator.generate(&pool, 2, "X1", &mut rng).unwrap();
        assert_eq!(paper.ordered_questions.len(), 2);
        assert_key_matches_paper(&paper);

        let order: Vec<String> = paper
            .ordered_questions
            .iter()
            .map(|q| q.id.clone())
            .collect();
        orders.insert(order);
    }
    assert!(orders.len() > 1, "mọi seed cho cùng một thứ tự câu");
}

#[test]
fn test_matrix_flow_end_to_end() {
    let mut pool = Vec::new();
    for (prefix, level, n) in [
        ("nb", BloomLevel::NhanBiet, 4),
        ("th", BloomLevel::ThongHieu, 3),
        ("vd", BloomLevel::VanDung, 2),
    ] {
        for i in 1..=n {
            pool.push(exam_paper_engine::QuestionRecord {
                id: format!("{}-{}", prefix, i),
                content: format!("Câu {} {}", prefix, i),
                kind: QuestionKind::MultipleChoice,
                options: vec!["A. Đúng".to_string(), "B. Sai".to_string()],
                correct_answer: "A".to_string(),
                bloom_level: level,
                ..Default::default()
            });
        }
    }

    let matrix = ExamMatrix::from_spec_str("Nhận biết=2,Thông hiểu=2,Vận dụng=1").unwrap();
    let mut rng = StdRng::seed_from_u64(77);

    let paper = ExamFlow::new()
        .assemble_by_matrix(&pool, &matrix, "MT-01", &mut rng)
        .unwrap();

    assert_eq!(paper.ordered_questions.len(), 5);
    let nb = paper
        .ordered_questions
        .iter()
        .filter(|q| q.bloom_level == BloomLevel::NhanBiet)
        .count();
    let th = paper
        .ordered_questions
        .iter()
        .filter(|q| q.bloom_level == BloomLevel::ThongHieu)
        .count();
    assert_eq!(nb, 2);
    assert_eq!(th, 2);
    assert_key_matches_paper(&paper);
}

#[test]
fn test_shortage_blocks_whole_exam() {
    // Thiếu một mức thì không rút gì cả, kể cả mức đang đủ
    let pool = vec![exam_paper_engine::QuestionRecord {
        id: "nb-1".to_string(),
        content: "Câu duy nhất".to_string(),
        bloom_level: BloomLevel::NhanBiet,
        ..Default::default()
    }];
    let matrix = ExamMatrix::new()
        .with(BloomLevel::NhanBiet, 1)
        .with(BloomLevel::SangTao, 2);
    let mut rng = StdRng::seed_from_u64(5);

    let err = SelectorService::new()
        .select(&pool, &matrix, &mut rng)
        .unwrap_err();

    match err {
        exam_paper_engine::SelectionError::Shortages(shortages) => {
            assert_eq!(shortages.len(), 1);
            assert_eq!(shortages[0].level, BloomLevel::SangTao);
            assert_eq!(shortages[0].available, 0);
            assert_eq!(shortages[0].requested, 2);
        }
        other => panic!("Lỗi không mong đợi: {:?}", other),
    }
}

#[test]
fn test_paper_json_round_trip() {
    let parser = ParserService::new();
    let records = parser.parse(RAW_EXAM);
    let mut rng = StdRng::seed_from_u64(99);
    let paper = GeneratorService::new()
        .generate(&records, records.len(), "RT-01", &mut rng)
        .unwrap();

    let json = serde_json::to_string_pretty(&paper).unwrap();
    let back: GeneratedPaper = serde_json::from_str(&json).unwrap();

    assert_eq!(back.exam_tag, paper.exam_tag);
    assert_eq!(back.answer_key.len(), paper.answer_key.len());
    for (position, entry) in &paper.answer_key {
        assert_eq!(back.answer_key[position].correct_letter, entry.correct_letter);
        assert_eq!(back.answer_key[position].correct_content, entry.correct_content);
    }
}
