extern crate dagparse;

mod test_utils;

mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use dagparse::dataset::Dataset;
    use dagparse::logging::null_logger;
    use dagparse::syntax::graph::Tag;
    use dagparse::syntax::transition::{Action, Config, Error, GoldState, Parser, Predictor, State};
    use dagparse::training::callbacks::Reporter;
    use dagparse::training::{Callback, Trainer, TrainingInfo};
    use dagparse::utils::rand::rng_from_seed;

    use super::test_utils::{canonical, mock};

    /// Always ranks SHIFT before REDUCE.
    #[derive(Debug, Default)]
    struct Greedy {
        updates: usize,
    }

    impl Predictor for Greedy {
        fn predict(&self, _state: &State) -> Vec<Action> {
            vec![Action::shift(), Action::reduce()]
        }

        fn update(&mut self, _state: &State, _predicted: &Action, _gold: &Action) -> bool {
            self.updates += 1;
            true
        }
    }

    /// Replays a fixed sequence, after an illegal first choice at every step.
    #[derive(Debug)]
    struct Scripted {
        actions: Vec<Action>,
    }

    impl Predictor for Scripted {
        fn predict(&self, state: &State) -> Vec<Action> {
            let mut ranked = vec![Action::implicit(Tag::Terminal)];
            ranked.extend(self.actions.get(state.step()).cloned());
            ranked
        }

        fn update(&mut self, _state: &State, _predicted: &Action, _gold: &Action) -> bool {
            false
        }
    }

    fn shifts(actions: &[Action]) -> usize {
        actions.iter().filter(|a| **a == Action::shift()).count()
    }

    #[test]
    fn test_train_and_evaluate() {
        let passage = mock::scene();
        let config = Config::default();
        let gold = GoldState::new(&passage, &config).unwrap();
        let mut parser = Parser::new(config, Greedy::default(), null_logger());

        let parsed = parser.train(&passage).unwrap();
        assert_eq!(parsed.total, gold.actions().len());
        assert_eq!(parsed.correct, shifts(gold.actions()));
        assert_eq!(parsed.updates, parsed.total - parsed.correct);
        assert_eq!(parser.predictor().updates, parsed.updates);
        assert_eq!(parsed.actions, gold.actions());
        assert_eq!(canonical(&parsed.passage), canonical(&passage));
        assert!(parsed.accuracy().unwrap() > 0.0);

        let evaluated = parser.evaluate(&passage).unwrap();
        assert_eq!(evaluated.correct, parsed.correct);
        assert_eq!(evaluated.updates, 0);
        assert_eq!(parser.predictor().updates, parsed.updates);
    }

    #[test]
    fn test_parse_with_predictor() {
        let passage = mock::remote_implicit();
        let config = Config {
            compound_swap: true,
            ..Config::default()
        };
        let gold = GoldState::new(&passage, &config).unwrap();
        let predictor = Scripted {
            actions: gold.actions().to_vec(),
        };
        let parser = Parser::new(config, predictor, null_logger());
        let parsed = parser.parse("remote", &passage.tokens()).unwrap();
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.actions, gold.actions());
        assert_eq!(parsed.accuracy(), None);
        assert_eq!(canonical(&parsed.passage), canonical(&passage));
    }

    #[test]
    fn test_parse_without_legal_prediction() {
        let passage = mock::scene();
        let predictor = Scripted { actions: vec![] };
        let parser = Parser::new(Config::default(), predictor, null_logger());
        match parser.parse("scene", &passage.tokens()) {
            Err(Error::NoLegalAction { .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[derive(Debug, Default)]
    struct Events {
        epochs: usize,
        batches: usize,
        validations: usize,
    }

    #[derive(Debug, Clone, Default)]
    struct Recorder(Rc<RefCell<Events>>);

    impl Callback for Recorder {
        fn on_epoch_begin(&mut self, _info: &TrainingInfo) {
            self.0.borrow_mut().epochs += 1;
        }

        fn on_batch_end(&mut self, _info: &TrainingInfo) {
            self.0.borrow_mut().batches += 1;
        }

        fn on_epoch_validate_end(&mut self, _info: &TrainingInfo) {
            self.0.borrow_mut().validations += 1;
        }
    }

    #[test]
    fn test_trainer_skips_failures() {
        let config = Config::default();
        let scene = mock::scene();
        let valid = mock::discontiguous();
        let scene_actions = GoldState::new(&scene, &config).unwrap().actions().to_vec();
        let valid_actions = GoldState::new(&valid, &config).unwrap().actions().to_vec();

        let parser = Parser::new(config, Greedy::default(), null_logger());
        let mut trainer = Trainer::new(parser);
        let recorder = Recorder::default();
        trainer.add_callback("recorder", recorder.clone());
        trainer.add_callback("reporter", Reporter::new(null_logger()));
        assert!(trainer.has_callback("reporter"));

        let mut train = Dataset::from_items(vec![scene, mock::doubly_attached()]);
        let valid = Dataset::from_items(vec![valid]);
        let mut rng = rng_from_seed(1);
        let summary = trainer.fit(&mut train, Some(&valid), 2, &mut rng).unwrap();

        assert_eq!(summary.epoch, 2);
        assert_eq!(summary.train.failures, 1);
        assert_eq!(summary.train.total, scene_actions.len());
        assert_eq!(summary.train.correct, shifts(&scene_actions));
        let valid_summary = summary.valid.unwrap();
        assert_eq!(valid_summary.total, valid_actions.len());
        assert_eq!(valid_summary.updates, 0);
        assert_eq!(valid_summary.failures, 0);

        let events = recorder.0.borrow();
        assert_eq!(events.epochs, 2);
        assert_eq!(events.batches, 2 * 2 + 2);
        assert_eq!(events.validations, 2);

        trainer.remove_callback("reporter");
        assert!(!trainer.has_callback("reporter"));
    }
}
